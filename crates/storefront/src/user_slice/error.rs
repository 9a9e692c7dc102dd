//! Error types for the user slice.

use crate::model::InvalidTransition;
use slice_framework::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    /// The requested user was not found.
    #[error("User not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("{}", .0.user_message())]
    Api(ApiError),

    #[error("Request {0} superseded")]
    Superseded(u64),

    /// An error occurred while communicating with the slice.
    #[error("Slice communication error: {0}")]
    SliceCommunicationError(String),
}

crate::impl_from_framework_error!(UserError);
