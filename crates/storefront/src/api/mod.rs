//! # REST API Layer
//!
//! Everything the slices need to talk to the storefront backend:
//!
//! - [`Transport`] - sends one [`ApiRequest`], implemented by [`http::HttpTransport`] and
//!   [`mock::MockTransport`]
//! - [`ApiClient`] - the interceptor every request goes through. It attaches the bearer
//!   token, expires the session on `401`, turns error responses into [`ApiError`] and
//!   decodes bodies (bare payload or `{ "data": ... }` envelope)
//! - [`resource::ResourceApi`] - typed CRUD helper for one collection route, used as the
//!   context of every slice

pub mod auth;
pub mod http;
pub mod mock;
pub mod resource;

pub use auth::{AuthSession, SessionStatus};
pub use resource::{routes, ListQuery, Listing, Page, ResourceApi};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use slice_framework::{ApiError, UNKNOWN_ERROR_MESSAGE};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One HTTP request, independent of the client library that sends it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Route relative to the API origin, e.g. `/api/products/42`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn with_query(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Serializes `body` as the JSON payload.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Value of a query parameter, if present.
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Status and decoded body of a response. An empty body is `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures where no HTTP response was obtained.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Sends requests to the backend.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// The request interceptor shared by all slices.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: AuthSession,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: AuthSession) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Sends `request` and returns the body of a successful response.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn execute(&self, mut request: ApiRequest) -> Result<Value, ApiError> {
        if let Some(token) = self.session.token() {
            request.bearer = Some(token);
        }

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(error = %e, "No response");
            ApiError::Network(e.to_string())
        })?;
        debug!(status = response.status, "Response");

        if response.status == 401 {
            warn!("Session rejected by server");
            self.session.invalidate();
            return Err(ApiError::Unauthorized);
        }
        if !response.is_success() {
            return Err(error_from_response(response));
        }
        Ok(response.body)
    }

    /// Sends `request` and decodes the body into `R`.
    pub async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let body = self.execute(request).await?;
        decode(body)
    }
}

/// Decodes a response body, accepting both a bare payload and a `{ "data": ... }` envelope.
pub fn decode<R: DeserializeOwned>(body: Value) -> Result<R, ApiError> {
    let data = match &body {
        Value::Object(map) => map.get("data").cloned(),
        _ => None,
    };
    match serde_json::from_value(body) {
        Ok(value) => Ok(value),
        Err(bare_err) => match data {
            Some(data) => serde_json::from_value(data)
                .map_err(|e| ApiError::Serialization(e.to_string())),
            None => Err(ApiError::Serialization(bare_err.to_string())),
        },
    }
}

/// Builds an [`ApiError`] from a non-success, non-401 response.
///
/// The message comes from the body's `message` (or `error`) string. Field errors come
/// from `errors`, given either as an object (`{ "code": "Expired" }`) or as a list of
/// `{ "field" | "path" | "param", "message" | "msg" }` entries.
pub fn error_from_response(response: ApiResponse) -> ApiError {
    let ApiResponse { status, body } = response;
    let message = ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string);
    let fields = body.get("errors").map(field_errors).unwrap_or_default();

    if matches!(status, 400 | 422) && !fields.is_empty() {
        return ApiError::Validation {
            message: message.unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
            fields,
        };
    }
    ApiError::Server { status, message }
}

fn field_errors(errors: &Value) -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    match errors {
        Value::Object(map) => {
            for (field, value) in map {
                let text = match value {
                    Value::String(s) => Some(s.clone()),
                    Value::Array(list) => list.first().and_then(Value::as_str).map(str::to_string),
                    Value::Object(inner) => inner
                        .get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                    _ => None,
                };
                if let Some(text) = text {
                    fields.insert(field.clone(), text);
                }
            }
        }
        Value::Array(list) => {
            for entry in list {
                let field = ["field", "path", "param"]
                    .iter()
                    .find_map(|key| entry.get(key).and_then(Value::as_str));
                let text = ["message", "msg"]
                    .iter()
                    .find_map(|key| entry.get(key).and_then(Value::as_str));
                if let (Some(field), Some(text)) = (field, text) {
                    fields.insert(field.to_string(), text.to_string());
                }
            }
        }
        _ => {}
    }
    fields
}
