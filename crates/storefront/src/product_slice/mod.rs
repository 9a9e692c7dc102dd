//! Product catalog slice, paginated.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ProductClient;
use crate::model::Product;
use slice_framework::SliceActor;

/// Creates a new product slice and its client.
pub fn new(buffer: usize) -> (SliceActor<Product>, ProductClient) {
    let (actor, inner) = SliceActor::new(buffer);
    (actor, ProductClient::new(inner))
}
