use super::Product;
use serde::{Deserialize, Serialize};

/// One cart line: an independent copy of the product data taken when it was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
    /// Known stock ceiling for this product, if any.
    #[serde(default)]
    pub stock: Option<u32>,
}

impl CartItem {
    /// Snapshots `product` as a line of `quantity` units.
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.images.first().cloned(),
            quantity,
            stock: product.stock,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    /// Caps `quantity` at the known stock.
    pub fn clamp_to_stock(&self, quantity: u32) -> u32 {
        match self.stock {
            Some(stock) => quantity.min(stock),
            None => quantity,
        }
    }
}

/// Derived cart totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub total_items: u64,
    pub total_price: f64,
}

impl CartSummary {
    pub fn of(items: &[CartItem]) -> Self {
        items.iter().fold(Self::default(), |acc, item| Self {
            total_items: acc.total_items + u64::from(item.quantity),
            total_price: acc.total_price + item.line_total(),
        })
    }
}

/// Body of `POST /api/cart`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartAdd {
    pub product_id: String,
    pub quantity: u32,
}

/// Body of `PUT /api/cart/:id`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CartQuantity {
    pub quantity: u32,
}
