//! # Storefront State Layer
//!
//! Client-side state of an e-commerce storefront, built on [`slice_framework`]. Each
//! resource (cart, favorites, products, categories, orders, users, reviews, promo codes)
//! is a slice running in its own task, reached through a typed client.
//!
//! ## Module Tour
//!
//! - [`api`] - the REST collaborator: bearer token interceptor, `401` handling, error
//!   normalization, typed collection routes, and a scripted transport for tests.
//! - [`model`] - plain records exchanged with the backend and their status lifecycles.
//! - [`clients`] - typed clients. Cart quantity bounds, idempotent favorites, checkout and
//!   moderation rules live here.
//! - `*_slice` - one module per resource: the slice factory, its
//!   [`SliceEntity`](slice_framework::SliceEntity) impl and its error type.
//! - [`lifecycle`] - [`Storefront`](lifecycle::Storefront), which starts every slice and
//!   shuts them down.
//! - [`config`] - environment configuration.
//!
//! ## Running the Demo
//!
//! ```bash
//! API_BASE_URL=http://localhost:5000 RUST_LOG=info cargo run -p storefront
//! ```

pub mod api;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;

pub mod cart_slice;
pub mod category_slice;
pub mod favorites_slice;
pub mod order_slice;
pub mod product_slice;
pub mod promo_code_slice;
pub mod review_slice;
pub mod user_slice;
