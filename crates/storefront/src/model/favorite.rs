use super::Product;
use serde::{Deserialize, Serialize};

/// A saved product. Identity is the product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

impl Favorite {
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image: product.images.first().cloned(),
        }
    }
}

/// Body of `POST /api/favorites`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteAdd {
    pub product_id: String,
}
