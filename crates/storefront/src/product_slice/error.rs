//! Error types for the product slice.

use slice_framework::ApiError;
use thiserror::Error;

/// Errors that can occur during product operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    /// The requested product was not found.
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The server refused or could not be reached.
    #[error("{}", .0.user_message())]
    Api(ApiError),

    /// A newer request on the same product answered first.
    #[error("Request {0} superseded")]
    Superseded(u64),

    /// An error occurred while communicating with the slice.
    #[error("Slice communication error: {0}")]
    SliceCommunicationError(String),
}

crate::impl_from_framework_error!(ProductError);
