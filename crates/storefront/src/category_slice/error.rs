use slice_framework::ApiError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CategoryError {
    #[error("Category not found: {0}")]
    NotFound(String),

    #[error("{}", .0.user_message())]
    Api(ApiError),

    #[error("Request {0} superseded")]
    Superseded(u64),

    #[error("Slice communication error: {0}")]
    SliceCommunicationError(String),
}

crate::impl_from_framework_error!(CategoryError);
