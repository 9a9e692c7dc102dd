//! Review slice: product reviews and moderation.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::ReviewClient;
use crate::model::Review;
use slice_framework::SliceActor;

/// Creates a new review slice and its client.
pub fn new(buffer: usize) -> (SliceActor<Review>, ReviewClient) {
    let (actor, inner) = SliceActor::new(buffer);
    (actor, ReviewClient::new(inner))
}
