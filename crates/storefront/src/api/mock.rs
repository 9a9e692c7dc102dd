//! # Mock Transport
//!
//! A scripted backend for tests. Each expectation matches a method and a path (plus,
//! optionally, query parameters and a JSON body) and says how to answer.
//!
//! Requests are matched against the first expectation that fits, not strictly in order,
//! so concurrent requests whose arrival order is not deterministic can still be scripted.
//! [`RequestExpectationBuilder::after`] delays an answer, which is how tests make an
//! older request resolve after a newer one.
//!
//! ```rust
//! use serde_json::json;
//! use std::sync::Arc;
//! use storefront::api::mock::MockTransport;
//! use storefront::api::{ApiClient, ApiRequest, AuthSession, Method};
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = Arc::new(MockTransport::new());
//!     transport
//!         .expect(Method::Get, "/api/categories")
//!         .return_json(200, json!([{ "_id": "c1", "name": "Lamps" }]));
//!
//!     let api = ApiClient::new(transport.clone(), AuthSession::new("/login"));
//!     let body = api.execute(ApiRequest::get("/api/categories")).await.unwrap();
//!     assert_eq!(body[0]["name"], "Lamps");
//!     transport.verify();
//! }
//! ```

use super::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;
use std::time::Duration;

enum Reply {
    Respond(ApiResponse),
    NetworkError(String),
}

struct Expected {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
    delay: Option<Duration>,
    reply: Reply,
}

impl Expected {
    fn matches(&self, request: &ApiRequest) -> bool {
        self.method == request.method
            && self.path == request.path
            && self
                .query
                .iter()
                .all(|(k, v)| request.query_param(k) == Some(v.as_str()))
            && self
                .body
                .as_ref()
                .map_or(true, |body| request.body.as_ref() == Some(body))
    }
}

/// A [`Transport`] answering from scripted expectations.
#[derive(Default)]
pub struct MockTransport {
    expectations: Mutex<Vec<Expected>>,
    received: Mutex<Vec<ApiRequest>>,
    mismatches: Mutex<Vec<String>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects one request with `method` on `path`.
    pub fn expect(&self, method: Method, path: impl Into<String>) -> RequestExpectationBuilder<'_> {
        RequestExpectationBuilder {
            mock: self,
            expected: Expected {
                method,
                path: path.into(),
                query: Vec::new(),
                body: None,
                delay: None,
                reply: Reply::NetworkError("no reply configured".to_string()),
            },
        }
    }

    /// Every request received so far, in arrival order.
    pub fn received(&self) -> Vec<ApiRequest> {
        self.received.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met and nothing unexpected arrived.
    pub fn verify(&self) {
        let mismatches = self.mismatches.lock().unwrap();
        if !mismatches.is_empty() {
            panic!("Unexpected requests: {:?}", *mismatches);
        }
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let pending: Vec<String> = exps
                .iter()
                .map(|e| format!("{} {}", e.method, e.path))
                .collect();
            panic!("Not all expectations were met: {pending:?}");
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.received.lock().unwrap().push(request.clone());

        let expected = {
            let mut exps = self.expectations.lock().unwrap();
            exps.iter()
                .position(|e| e.matches(&request))
                .map(|index| exps.remove(index))
        };
        let Some(expected) = expected else {
            let summary = format!("{} {}", request.method, request.path);
            self.mismatches.lock().unwrap().push(summary.clone());
            return Err(TransportError::Connection(format!(
                "unexpected request {summary}"
            )));
        };

        if let Some(delay) = expected.delay {
            tokio::time::sleep(delay).await;
        }
        match expected.reply {
            Reply::Respond(response) => Ok(response),
            Reply::NetworkError(message) => Err(TransportError::Connection(message)),
        }
    }
}

/// Builder for request expectations.
pub struct RequestExpectationBuilder<'a> {
    mock: &'a MockTransport,
    expected: Expected,
}

impl RequestExpectationBuilder<'_> {
    /// Only match requests carrying this query parameter.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.expected.query.push((key.into(), value.into()));
        self
    }

    /// Only match requests with exactly this JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.expected.body = Some(body);
        self
    }

    /// Wait this long before answering.
    pub fn after(mut self, delay: Duration) -> Self {
        self.expected.delay = Some(delay);
        self
    }

    /// Answers with `status` and a JSON body.
    pub fn return_json(self, status: u16, body: Value) {
        self.push(Reply::Respond(ApiResponse { status, body }));
    }

    /// Answers with `status` and an empty body.
    pub fn return_status(self, status: u16) {
        self.return_json(status, Value::Null);
    }

    /// Fails as if no response arrived.
    pub fn return_network_error(self, message: impl Into<String>) {
        self.push(Reply::NetworkError(message.into()));
    }

    fn push(mut self, reply: Reply) {
        self.expected.reply = reply;
        self.mock.expectations.lock().unwrap().push(self.expected);
    }
}
