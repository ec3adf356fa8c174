//! HTTP(S) transport for Bitcoin Core JSON-RPC, built on `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Url};

use crate::connection::{ConnectionConfig, Credentials};
use crate::error::{CoreError, RpcError};

use super::{RawResponse, RpcTransport};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts serialized envelopes to `scheme://host:port/` with basic auth.
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    credentials: Credentials,
}

impl HttpTransport {
    pub fn new(config: &ConnectionConfig) -> Result<Self, CoreError> {
        let url = config.url()?;

        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout()))
            .timeout(config.timeout())
            .tcp_nodelay(true)
            .build()
            .map_err(|e| CoreError::InvalidConfig(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            credentials: config.credentials().clone(),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post(&self, body: Vec<u8>) -> Result<RawResponse, RpcError> {
        let response = self
            .client
            .post(self.url.clone())
            .header(header::CONTENT_TYPE, "application/json")
            .basic_auth(self.credentials.user(), Some(self.credentials.password()))
            .body(body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(Box::new(e)))?;
        let status = response.status();

        let body = response
            .bytes()
            .await
            .map_err(|e| RpcError::Transport(Box::new(e)))?;

        Ok(RawResponse {
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}
