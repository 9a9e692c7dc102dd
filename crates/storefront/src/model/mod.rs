//! # Data Models
//!
//! Plain records exchanged with the backend. All ids are strings; the backend's `_id`
//! is accepted wherever `id` is expected.

pub mod cart;
pub mod category;
pub mod favorite;
pub mod order;
pub mod product;
pub mod promo_code;
pub mod review;
pub mod status;
pub mod user;

pub use cart::*;
pub use category::*;
pub use favorite::*;
pub use order::*;
pub use product::*;
pub use promo_code::*;
pub use review::*;
pub use status::*;
pub use user::*;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a reference that the backend sends either as a bare id or as a populated
/// document (`{ "_id": "...", "name": "..." }`), keeping only the id.
pub(crate) fn reference<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(id)) => Some(id),
        Some(Value::Object(doc)) => ["_id", "id"]
            .iter()
            .find_map(|key| doc.get(*key).and_then(Value::as_str))
            .map(str::to_string),
        _ => None,
    })
}
