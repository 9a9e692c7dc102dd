use serde::{Deserialize, Serialize};

fn default_active() -> bool {
    true
}

/// A catalog entry. Created, updated and deleted only through admin operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Category id; a populated category document is reduced to its id.
    #[serde(default, deserialize_with = "super::reference")]
    pub category: Option<String>,
    /// Units available, `None` when the backend does not report stock.
    #[serde(default)]
    pub stock: Option<u32>,
    /// Image URLs in display order.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock.map_or(true, |stock| stock > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub stock: u32,
    pub images: Vec<String>,
    pub active: bool,
}

/// Partial update; absent fields are left unchanged by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
