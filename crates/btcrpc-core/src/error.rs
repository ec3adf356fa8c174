/// Boxed source for transport failures so that any transport implementation
/// can report its own error type.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A single RPC round trip failed. `method` names the remote method.
    #[error("`{method}` failed: {error}")]
    Rpc { method: String, error: RpcError },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    pub(crate) fn rpc(method: &str, error: RpcError) -> Self {
        Self::Rpc {
            method: method.to_owned(),
            error,
        }
    }

    /// The RPC failure behind this error, if it came from a round trip.
    pub fn rpc_error(&self) -> Option<&RpcError> {
        match self {
            Self::Rpc { error, .. } => Some(error),
            Self::InvalidConfig(_) => None,
        }
    }
}

/// Structured RPC failure, one variant per failure kind.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// The request envelope could not be built from the caller's arguments.
    #[error("request construction error: {0}")]
    RequestConstruction(String),

    /// Connection, timeout, or body-read failure.
    #[error("transport error: {0}")]
    Transport(#[source] BoxError),

    /// The response body is not valid JSON.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// The node answered with a JSON-RPC error object.
    #[error("remote method error {code}: {message}")]
    Server { code: i64, message: String },

    /// Valid JSON that is not a usable JSON-RPC response envelope.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl RpcError {
    /// Short stable name of the failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestConstruction(_) => "request-construction",
            Self::Transport(_) => "transport",
            Self::Deserialization(_) => "deserialization",
            Self::Server { .. } => "remote-method",
            Self::InvalidResponse(_) => "invalid-response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rpc_error_display_names_method_and_upstream_message() {
        let err = CoreError::rpc(
            "getbalance",
            RpcError::Server {
                code: -18,
                message: "Requested wallet does not exist or is not loaded".into(),
            },
        );
        let text = err.to_string();
        assert!(text.contains("`getbalance`"));
        assert!(text.contains("-18"));
        assert!(text.contains("Requested wallet does not exist"));
        assert_eq!(err.rpc_error().map(RpcError::kind), Some("remote-method"));
    }

    #[test]
    fn invalid_config_has_no_rpc_error() {
        let err = CoreError::InvalidConfig("port must be non-zero".into());
        assert!(err.rpc_error().is_none());
    }
}
