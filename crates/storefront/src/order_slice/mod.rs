//! Order slice: checkout, history and the admin order board.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::OrderClient;
use crate::model::Order;
use slice_framework::SliceActor;

/// Creates a new order slice and its client.
pub fn new(buffer: usize) -> (SliceActor<Order>, OrderClient) {
    let (actor, inner) = SliceActor::new(buffer);
    (actor, OrderClient::new(inner))
}
