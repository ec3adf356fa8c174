//! JSON-RPC 1.0 envelopes as spoken by Bitcoin Core.

use serde::{Deserialize, Serialize};

use crate::error::RpcError;

pub const JSONRPC_VERSION: &str = "1.0";

// ==============================================================================
// Request
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: u64,
}

impl RpcRequest {
    /// Build a request envelope.
    ///
    /// `params` must serialize to a JSON array (positional) or object (named).
    /// `()` / `null` becomes an empty array. Method names are not checked
    /// against any known set; the node rejects unknown methods itself.
    pub fn new<P>(method: &str, params: &P, id: u64) -> Result<Self, RpcError>
    where
        P: Serialize + ?Sized,
    {
        if method.trim().is_empty() {
            return Err(RpcError::RequestConstruction(
                "method name must not be empty".to_owned(),
            ));
        }

        let params = match serde_json::to_value(params) {
            Ok(serde_json::Value::Null) => serde_json::Value::Array(Vec::new()),
            Ok(value @ (serde_json::Value::Array(_) | serde_json::Value::Object(_))) => value,
            Ok(other) => {
                return Err(RpcError::RequestConstruction(format!(
                    "params for `{method}` must be a JSON array or object, got {other}"
                )));
            }
            Err(e) => {
                return Err(RpcError::RequestConstruction(format!(
                    "params for `{method}` are not representable as JSON: {e}"
                )));
            }
        };

        Ok(Self {
            jsonrpc: JSONRPC_VERSION.to_owned(),
            method: method.to_owned(),
            params,
            id,
        })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RpcError> {
        serde_json::to_vec(self).map_err(|e| {
            RpcError::RequestConstruction(format!("serialize `{}` request: {e}", self.method))
        })
    }
}

// ==============================================================================
// Response
// ==============================================================================

/// The `{code, message}` error object of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// A decoded response envelope. `result` stays opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcResponse {
    pub result: serde_json::Value,
    pub id: serde_json::Value,
}

/// Decode a raw response body into its result.
///
/// Fails with `Deserialization` when the body is not JSON, `Server` when the
/// node returned an error object, and `InvalidResponse` for JSON that is not
/// a response envelope. `status` is only used to enrich error messages.
pub fn decode_response(body: &[u8], status: u16) -> Result<RpcResponse, RpcError> {
    let raw: serde_json::Value = serde_json::from_slice(body).map_err(|e| {
        RpcError::Deserialization(format!(
            "decode JSON-RPC response (HTTP {status}): {e}; body={}",
            String::from_utf8_lossy(body)
        ))
    })?;

    let mut envelope = match raw {
        serde_json::Value::Object(map) => map,
        other => {
            return Err(RpcError::InvalidResponse(format!(
                "expected a JSON object envelope (HTTP {status}), got {other}"
            )));
        }
    };

    let id = envelope.remove("id").unwrap_or(serde_json::Value::Null);
    match envelope.remove("error") {
        None | Some(serde_json::Value::Null) => {}
        Some(err) => return Err(parse_jsonrpc_error(err)),
    }

    let result = envelope.remove("result").ok_or_else(|| {
        RpcError::InvalidResponse(format!(
            "response carries neither result nor error (HTTP {status})"
        ))
    })?;

    Ok(RpcResponse { result, id })
}

/// Parse a JSON-RPC error value into a structured `RpcError`.
///
/// Errors matching `{"code": <int>, "message": <string>}` become `Server`;
/// anything else falls back to `InvalidResponse` with the raw JSON.
pub(super) fn parse_jsonrpc_error(err: serde_json::Value) -> RpcError {
    match serde_json::from_value::<RpcErrorObject>(err.clone()) {
        Ok(parsed) => RpcError::Server {
            code: parsed.code,
            message: parsed.message,
        },
        Err(_) => RpcError::InvalidResponse(format!("non-standard JSON-RPC error: {err}")),
    }
}
