//! [`SliceEntity`] implementation for [`CartItem`].
//!
//! Re-adding a product absorbs the new line into the existing one: quantities add up,
//! capped at the known stock, and the price captured on the first add is kept.

use crate::api::ResourceApi;
use crate::model::{CartItem, CartSummary};
use slice_framework::SliceEntity;

impl SliceEntity for CartItem {
    type Id = String;
    type Summary = CartSummary;
    type Context = ResourceApi<CartItem>;

    fn id(&self) -> &String {
        &self.id
    }

    fn absorb(&mut self, incoming: Self) {
        if incoming.stock.is_some() {
            self.stock = incoming.stock;
        }
        let quantity = self.quantity.saturating_add(incoming.quantity);
        self.quantity = self.clamp_to_stock(quantity);
    }

    /// Zero-quantity lines never stay in the cart.
    fn is_retained(&self) -> bool {
        self.quantity > 0
    }

    fn summarize(items: &[Self]) -> CartSummary {
        CartSummary::of(items)
    }
}
