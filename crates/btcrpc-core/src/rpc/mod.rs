//! Bitcoin Core RPC client.
//!
//! [`RpcClient`] owns a transport and performs one request/response round trip
//! per call: build the envelope, post it, decode the response. The fixed set
//! of node methods lives in [`methods`]; [`HttpTransport`] is the production
//! transport and `mock::MockTransport` the in-memory one used by tests.

mod http_adapter;
pub mod methods;
#[cfg(test)]
pub mod mock;
pub mod outcome;
pub mod protocol;

pub use http_adapter::HttpTransport;
pub use methods::NodeMethod;
pub use outcome::RpcOutcome;

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::connection::ConnectionConfig;
use crate::error::{CoreError, RpcError};

use protocol::{decode_response, RpcRequest};

/// Status and full body of one HTTP round trip.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Carries one serialized request envelope to the node and returns the raw
/// response. Implementations must not interpret the body.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn post(&self, body: Vec<u8>) -> Result<RawResponse, RpcError>;
}

// ==============================================================================
// RpcClient
// ==============================================================================

pub struct RpcClient<T = HttpTransport> {
    transport: T,
    next_id: AtomicU64,
}

impl RpcClient<HttpTransport> {
    /// Build an HTTP client for the given connection.
    pub fn connect(config: &ConnectionConfig) -> Result<Self, CoreError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: RpcTransport> RpcClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn reserve_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Call any node method and return its opaque result.
    ///
    /// Failures carry the method name so the caller can tell which call broke.
    pub async fn call<P>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<serde_json::Value, CoreError>
    where
        P: Serialize + ?Sized + Sync,
    {
        self.round_trip(method, params)
            .await
            .map_err(|error| CoreError::rpc(method, error))
    }

    async fn round_trip<P>(
        &self,
        method: &str,
        params: &P,
    ) -> Result<serde_json::Value, RpcError>
    where
        P: Serialize + ?Sized + Sync,
    {
        let id = self.reserve_request_id();
        let request = RpcRequest::new(method, params, id)?;
        let body = request.to_bytes()?;
        debug!(
            rpc.id = id,
            rpc.method = method,
            rpc.params = %request.params,
            "rpc call"
        );

        let response = self.transport.post(body).await?;
        debug!(
            rpc.id = id,
            rpc.method = method,
            status = response.status,
            body_len = response.body.len(),
            "rpc response"
        );
        trace!(
            rpc.id = id,
            rpc.method = method,
            body = %String::from_utf8_lossy(&response.body),
            "rpc response body"
        );

        let decoded = decode_response(&response.body, response.status)?;
        if decoded.id != serde_json::json!(id) {
            warn!(
                rpc.id = id,
                rpc.method = method,
                echoed_id = %decoded.id,
                "response id does not match request id"
            );
        }
        Ok(decoded.result)
    }
}
