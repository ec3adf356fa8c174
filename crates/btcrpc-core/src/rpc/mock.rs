use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::RpcError;

use super::protocol::RpcRequest;
use super::{RawResponse, RpcTransport};

#[derive(Clone)]
enum Reply {
    Body { status: u16, body: Vec<u8> },
    Refused,
}

/// An in-memory transport for testing. Replies are served in the order they
/// were added; once the queue is empty the last reply repeats. Every request
/// body is decoded and kept for inspection.
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    last: Mutex<Option<Reply>>,
    requests: Mutex<Vec<RpcRequest>>,
}

impl MockTransport {
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder {
            replies: VecDeque::new(),
        }
    }

    /// Requests received so far, decoded from their wire form.
    pub fn requests(&self) -> Vec<RpcRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

pub struct MockTransportBuilder {
    replies: VecDeque<Reply>,
}

impl MockTransportBuilder {
    pub fn with_body(self, body: &str) -> Self {
        self.with_status_body(200, body)
    }

    pub fn with_status_body(mut self, status: u16, body: &str) -> Self {
        self.replies.push_back(Reply::Body {
            status,
            body: body.as_bytes().to_vec(),
        });
        self
    }

    /// Simulate a node that refuses the connection.
    pub fn refusing(mut self) -> Self {
        self.replies.push_back(Reply::Refused);
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            replies: Mutex::new(self.replies),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn post(&self, body: Vec<u8>) -> Result<RawResponse, RpcError> {
        let request: RpcRequest =
            serde_json::from_slice(&body).expect("client must send a valid request envelope");
        self.requests.lock().expect("requests lock").push(request);

        let reply = {
            let mut last = self.last.lock().expect("last reply lock");
            match self.replies.lock().expect("replies lock").pop_front() {
                Some(reply) => {
                    *last = Some(reply.clone());
                    reply
                }
                None => last.clone().expect("mock transport has no reply configured"),
            }
        };

        match reply {
            Reply::Body { status, body } => Ok(RawResponse { status, body }),
            Reply::Refused => Err(RpcError::Transport(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))),
        }
    }
}
