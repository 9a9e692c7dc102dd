//! Promo code slice: checkout validation and administration.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::PromoCodeClient;
use crate::model::PromoCode;
use slice_framework::SliceActor;

/// Creates a new promo code slice and its client.
pub fn new(buffer: usize) -> (SliceActor<PromoCode>, PromoCodeClient) {
    let (actor, inner) = SliceActor::new(buffer);
    (actor, PromoCodeClient::new(inner))
}
