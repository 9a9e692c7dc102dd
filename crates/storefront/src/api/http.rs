//! [`Transport`] over HTTP, backed by `reqwest`.

use super::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::config::StorefrontConfig;
use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: &StorefrontConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        reqwest::Url::parse(&config.api_base_url)
            .map_err(|e| TransportError::InvalidRequest(format!("invalid base url: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(
        name = "http_send",
        skip(self, request),
        fields(method = %request.method, path = %request.path)
    )]
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = self
            .client
            .request(request.method.into(), url)
            .query(&request.query);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Connection(e.to_string())
            }
        })?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Connection(format!("read body failed: {e}")))?;
        debug!(status, len = bytes.len(), "Received");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            // Non-JSON bodies (proxy error pages) are kept as text.
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        Ok(ApiResponse { status, body })
    }
}
