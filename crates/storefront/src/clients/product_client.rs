use crate::model::{Product, ProductCreate, ProductUpdate};
use crate::product_slice::ProductError;
use slice_framework::SliceClient;

/// Client for the product catalog.
///
/// Shoppers use `fetch_products` and `fetch_product`; the remaining operations are admin
/// only. Deleting a product clears it from `selected` when it is the open detail view.
#[derive(Clone)]
pub struct ProductClient {
    inner: SliceClient<Product>,
}

crate::impl_admin_client!(
    ProductClient,
    Product,
    ProductError,
    ProductCreate,
    ProductUpdate,
    product,
    products,
);
