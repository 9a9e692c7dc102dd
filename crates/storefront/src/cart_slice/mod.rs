//! Cart slice: lines, quantity bounds and derived totals.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CartClient;
use crate::model::CartItem;
use slice_framework::SliceActor;

/// Creates a new cart slice and its client.
///
/// The slice still needs its context: pass a [`ResourceApi`](crate::api::ResourceApi)
/// on `/api/cart` to [`SliceActor::run`].
pub fn new(buffer: usize) -> (SliceActor<CartItem>, CartClient) {
    let (actor, inner) = SliceActor::new(buffer);
    (actor, CartClient::new(inner))
}
