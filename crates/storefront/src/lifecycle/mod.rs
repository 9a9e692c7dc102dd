//! Starting, wiring and stopping the slices.

pub mod storefront;

pub use storefront::*;
