//! Error types for the order slice.

use crate::model::InvalidTransition;
use slice_framework::ApiError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// Checkout was attempted with nothing to order.
    #[error("Cannot place an empty order")]
    EmptyOrder,

    /// The order's lifecycle does not allow the requested status.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),

    /// The server refused or could not be reached.
    #[error("{}", .0.user_message())]
    Api(ApiError),

    /// A newer request on the same order answered first.
    #[error("Request {0} superseded")]
    Superseded(u64),

    /// An error occurred while communicating with the slice.
    #[error("Slice communication error: {0}")]
    SliceCommunicationError(String),
}

crate::impl_from_framework_error!(OrderError);
