//! Type-safe wrappers around [`SliceClient`](slice_framework::SliceClient).
//!
//! The admin CRUD surface is generated by [`impl_admin_client!`](crate::impl_admin_client);
//! everything domain-specific (cart bounds, checkout, moderation) is written per client.

pub mod crud;
pub mod macros;

pub mod cart_client;
pub mod category_client;
pub mod favorites_client;
pub mod order_client;
pub mod product_client;
pub mod promo_code_client;
pub mod review_client;
pub mod user_client;

pub use cart_client::*;
pub use category_client::*;
pub use favorites_client::*;
pub use order_client::*;
pub use product_client::*;
pub use promo_code_client::*;
pub use review_client::*;
pub use user_client::*;
