//! Error types for the cart slice.

use slice_framework::ApiError;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    /// The line or product was not found.
    #[error("Cart item not found: {0}")]
    NotFound(String),

    /// Zero units can not be added.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Nothing more of this product can go into the cart.
    #[error("Only {available} more in stock, {requested} requested")]
    StockExceeded { requested: u32, available: u32 },

    /// The server refused or could not be reached.
    #[error("{}", .0.user_message())]
    Api(ApiError),

    /// A newer request on the same line answered first.
    #[error("Request {0} superseded")]
    Superseded(u64),

    /// An error occurred while communicating with the slice.
    #[error("Slice communication error: {0}")]
    SliceCommunicationError(String),
}

crate::impl_from_framework_error!(CartError);
