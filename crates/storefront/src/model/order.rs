use super::{CartItem, HasStatus, StatusTransition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order lifecycle: pending → processing → shipped → delivered, or cancelled from
/// pending/processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl StatusTransition for OrderStatus {
    fn allowed_targets(self) -> &'static [Self] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Processing, OrderStatus::Cancelled],
            OrderStatus::Processing => &[OrderStatus::Shipped, OrderStatus::Cancelled],
            OrderStatus::Shipped => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Paypal,
    CashOnDelivery,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub full_name: String,
    pub street: String,
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A product as it was when the order was placed; never a live reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(alias = "product", deserialize_with = "product_id")]
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
}

fn product_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    super::reference(deserializer)?
        .ok_or_else(|| serde::de::Error::custom("order line without product id"))
}

impl OrderLine {
    pub fn from_cart_item(item: &CartItem) -> Self {
        Self {
            product_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "super::reference")]
    pub user: Option<String>,
    pub items: Vec<OrderLine>,
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// As computed by the server, which may differ from what the client sent.
    #[serde(rename = "totalAmount", alias = "total")]
    pub total: f64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl HasStatus for Order {
    type Status = OrderStatus;

    fn status(&self) -> OrderStatus {
        self.status
    }
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub items: Vec<OrderLine>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(rename = "totalAmount")]
    pub total: f64,
}

impl OrderCreate {
    /// Snapshots the cart lines and totals them client-side. The server recomputes the
    /// total and its figure wins.
    pub fn from_cart(
        items: &[CartItem],
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Self {
        let items: Vec<OrderLine> = items.iter().map(OrderLine::from_cart_item).collect();
        let total = items.iter().map(OrderLine::line_total).sum();
        Self {
            items,
            shipping_address,
            payment_method,
            total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<ShippingAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

/// Derived order totals. Cancelled orders bring no revenue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OrderSummary {
    pub orders: u64,
    pub revenue: f64,
}

impl OrderSummary {
    pub fn of(orders: &[Order]) -> Self {
        Self {
            orders: orders.len() as u64,
            revenue: orders
                .iter()
                .filter(|order| order.status != OrderStatus::Cancelled)
                .map(|order| order.total)
                .sum(),
        }
    }
}
