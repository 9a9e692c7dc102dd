//! User administration slice.

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::UserClient;
use crate::model::User;
use slice_framework::SliceActor;

/// Creates a new user slice and its client.
pub fn new(buffer: usize) -> (SliceActor<User>, UserClient) {
    let (actor, inner) = SliceActor::new(buffer);
    (actor, UserClient::new(inner))
}
