//! Favorites slice.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::FavoritesClient;
use crate::model::Favorite;
use slice_framework::SliceActor;

/// Creates a new favorites slice and its client.
pub fn new(buffer: usize) -> (SliceActor<Favorite>, FavoritesClient) {
    let (actor, inner) = SliceActor::new(buffer);
    (actor, FavoritesClient::new(inner))
}
