pub mod connection;
pub mod error;
pub mod rpc;

pub use connection::{ConnectionConfig, Credentials, Scheme};
pub use error::{CoreError, RpcError};
pub use rpc::{HttpTransport, NodeMethod, RpcClient, RpcOutcome, RpcTransport};
