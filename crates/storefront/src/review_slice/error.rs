use crate::model::InvalidTransition;
use slice_framework::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReviewError {
    #[error("Review not found: {0}")]
    NotFound(String),

    /// Moderation refused locally.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    #[error("{}", .0.user_message())]
    Api(ApiError),

    #[error("Request {0} superseded")]
    Superseded(u64),

    #[error("Slice communication error: {0}")]
    SliceCommunicationError(String),
}

crate::impl_from_framework_error!(ReviewError);
