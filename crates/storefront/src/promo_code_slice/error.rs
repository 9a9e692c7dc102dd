//! Error types for the promo code slice.

use crate::model::InvalidTransition;
use slice_framework::ApiError;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors that can occur during promo code operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PromoCodeError {
    /// Unknown code, or a code id that does not exist.
    #[error("Promo code not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// The server refused or could not be reached. Validation failures keep their
    /// per-field messages, see [`PromoCodeError::field_errors`].
    #[error("{}", .0.user_message())]
    Api(ApiError),

    /// The user typed another code before this one was checked.
    #[error("Request {0} superseded")]
    Superseded(u64),

    /// An error occurred while communicating with the slice.
    #[error("Slice communication error: {0}")]
    SliceCommunicationError(String),
}

impl PromoCodeError {
    /// Per-field messages of a validation failure, e.g. `{"code": "Code expired"}`.
    pub fn field_errors(&self) -> BTreeMap<String, String> {
        match self {
            PromoCodeError::Api(api) => api.field_errors(),
            _ => BTreeMap::new(),
        }
    }
}

crate::impl_from_framework_error!(PromoCodeError);
