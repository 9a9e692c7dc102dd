//! # Framework Errors
//!
//! Two layers of errors live here:
//!
//! - [`ApiError`]: what a remote call can fail with. It is transport-agnostic; the REST layer
//!   of the application maps HTTP failures into it.
//! - [`FrameworkError`]: what a dispatched operation can fail with, including failures of the
//!   slice itself (closed mailbox, dropped responder, superseded response).
//!
//! Slices store [`ApiError::user_message`] in their `error` field, so every failure a user
//! can see is normalized to one human-readable string.

use std::collections::BTreeMap;

/// Fallback when the server answered with an error but gave no message.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Shown when no response arrived at all.
pub const NO_CONNECTION_MESSAGE: &str = "No connection to the server";

/// Shown after the server rejected the session token.
pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired, please sign in again";

/// Failure of a remote call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// No response arrived (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),
    /// The server answered 401.
    #[error("Unauthorized")]
    Unauthorized,
    /// Any other non-success status.
    #[error("Server error {status}: {}", .message.as_deref().unwrap_or(UNKNOWN_ERROR_MESSAGE))]
    Server {
        status: u16,
        message: Option<String>,
    },
    /// 400/422 carrying per-field messages.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },
    /// The response body could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// Refused locally before anything was sent.
    #[error("Rejected: {0}")]
    Rejected(String),
}

impl ApiError {
    /// Message suitable for display, following the server-message-first rule.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => NO_CONNECTION_MESSAGE.to_string(),
            ApiError::Unauthorized => SESSION_EXPIRED_MESSAGE.to_string(),
            ApiError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            ApiError::Server { .. } => UNKNOWN_ERROR_MESSAGE.to_string(),
            ApiError::Validation { message, .. } => message.clone(),
            ApiError::Serialization(_) => UNKNOWN_ERROR_MESSAGE.to_string(),
            ApiError::Rejected(reason) => reason.clone(),
        }
    }

    /// Per-field messages, empty unless this is a validation failure.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            ApiError::Validation { fields, .. } => fields.clone(),
            _ => BTreeMap::new(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => Some(401),
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors that can occur while running an operation through a slice.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameworkError {
    #[error("Slice closed")]
    SliceClosed,
    #[error("Slice dropped response channel")]
    SliceDropped,
    /// A newer request on the same target answered first; this response was discarded.
    #[error("Request {0} superseded by a newer request")]
    Superseded(u64),
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl FrameworkError {
    /// The underlying remote failure, if this error came from the server.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            FrameworkError::Api(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_preferred() {
        let error = ApiError::Server {
            status: 409,
            message: Some("Out of stock".to_string()),
        };
        assert_eq!(error.user_message(), "Out of stock");
    }

    #[test]
    fn test_fallback_messages() {
        let silent = ApiError::Server {
            status: 500,
            message: None,
        };
        let blank = ApiError::Server {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(silent.user_message(), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(blank.user_message(), UNKNOWN_ERROR_MESSAGE);
        assert_eq!(
            ApiError::Network("connection refused".into()).user_message(),
            NO_CONNECTION_MESSAGE
        );
    }

    #[test]
    fn test_field_errors_only_for_validation() {
        let mut fields = BTreeMap::new();
        fields.insert("code".to_string(), "Unknown code".to_string());
        let error = ApiError::Validation {
            message: "Invalid promo code".into(),
            fields: fields.clone(),
        };
        assert_eq!(error.field_errors(), fields);
        assert!(ApiError::Unauthorized.field_errors().is_empty());
    }

    #[test]
    fn test_not_found_detection() {
        let error = FrameworkError::from(ApiError::Server {
            status: 404,
            message: None,
        });
        assert!(error.api().is_some_and(ApiError::is_not_found));
        assert!(FrameworkError::SliceClosed.api().is_none());
    }
}
