//! Category slice.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CategoryClient;
use crate::model::Category;
use slice_framework::SliceActor;

/// Creates a new category slice and its client.
pub fn new(buffer: usize) -> (SliceActor<Category>, CategoryClient) {
    let (actor, inner) = SliceActor::new(buffer);
    (actor, CategoryClient::new(inner))
}
