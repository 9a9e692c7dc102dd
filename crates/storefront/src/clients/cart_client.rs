use crate::api::{decode, ApiRequest, Listing, ResourceApi};
use crate::cart_slice::CartError;
use crate::model::{CartAdd, CartItem, CartQuantity, Product};
use async_trait::async_trait;
use serde::Deserialize;
use slice_framework::{
    ApiError, Fold, FrameworkError, Operation, SliceClient, SliceState, StorePort, Target,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// What the cart routes answer with: the touched line or the whole cart.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CartReply {
    Line(CartItem),
    Cart(Listing<CartItem>),
}

impl CartReply {
    /// Folds a line with `line_fold` and a whole cart by replacing everything.
    /// `stock` fills in a ceiling the server left out.
    fn into_fold(
        self,
        stock: Option<u32>,
        line_fold: fn(CartItem) -> Fold<CartItem>,
    ) -> Fold<CartItem> {
        match self {
            CartReply::Line(mut line) => {
                if line.stock.is_none() {
                    line.stock = stock;
                }
                line_fold(line)
            }
            CartReply::Cart(listing) => Fold::replace_all(listing.into_page().items),
        }
    }
}

async fn list_cart(api: Arc<ResourceApi<CartItem>>) -> Result<Fold<CartItem>, ApiError> {
    Ok(Fold::replace_all(api.list_all().await?))
}

async fn post_line(
    api: Arc<ResourceApi<CartItem>>,
    body: CartAdd,
    snapshot: CartItem,
) -> Result<Fold<CartItem>, ApiError> {
    let request = ApiRequest::post(api.base()).json(&body)?;
    let reply = api.api().execute(request).await?;
    // An empty acknowledgement still means the line was accepted as sent.
    if reply.is_null() {
        return Ok(Fold::Merge(snapshot));
    }
    Ok(decode::<CartReply>(reply)?.into_fold(snapshot.stock, Fold::Merge))
}

async fn put_quantity(
    api: Arc<ResourceApi<CartItem>>,
    id: String,
    body: CartQuantity,
    known: Option<CartItem>,
) -> Result<Fold<CartItem>, ApiError> {
    let request = ApiRequest::put(api.path(&id)).json(&body)?;
    let reply = api.api().execute(request).await?;
    let stock = known.as_ref().and_then(|line| line.stock);
    match (reply.is_null(), known) {
        (true, Some(mut line)) => {
            line.quantity = body.quantity;
            Ok(Fold::Splice(line))
        }
        (true, None) => Ok(Fold::Keep),
        (false, _) => Ok(decode::<CartReply>(reply)?.into_fold(stock, Fold::Splice)),
    }
}

async fn delete_line(
    api: Arc<ResourceApi<CartItem>>,
    id: String,
) -> Result<Fold<CartItem>, ApiError> {
    api.delete(&id).await?;
    Ok(Fold::Remove(id))
}

async fn clear_lines(api: Arc<ResourceApi<CartItem>>) -> Result<Fold<CartItem>, ApiError> {
    api.clear().await?;
    Ok(Fold::Clear)
}

/// Client for the cart slice.
///
/// Quantity bounds live here: adds of zero units are refused, adds and updates are capped
/// at the stock when it is known, and a quantity that ends up at zero or less removes the
/// line. Every mutation is pessimistic, so a failed call leaves the cart as it was.
#[derive(Clone)]
pub struct CartClient {
    inner: SliceClient<CartItem>,
}

impl CartClient {
    pub fn new(inner: SliceClient<CartItem>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn fetch_cart(&self) -> Result<SliceState<CartItem>, CartError> {
        debug!("Sending request");
        self.dispatch(Operation::new("fetch_cart", Target::Collection, list_cart))
            .await
    }

    /// Adds `quantity` units of `product`, merging into an existing line.
    ///
    /// When the stock is known, the amount is capped so the line stays within it. Products
    /// without stock information are added as requested.
    #[instrument(skip(self, product), fields(product = %product.id))]
    pub async fn add_item(
        &self,
        product: &Product,
        quantity: u32,
    ) -> Result<SliceState<CartItem>, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }
        let current = self.inner.current();
        let line = current.get(&product.id);
        let in_cart = line.map_or(0, |line| line.quantity);
        let stock = product.stock.or_else(|| line.and_then(|line| line.stock));

        let adding = match stock {
            Some(stock) => {
                let available = stock.saturating_sub(in_cart);
                if available == 0 {
                    return Err(CartError::StockExceeded {
                        requested: quantity,
                        available,
                    });
                }
                quantity.min(available)
            }
            None => quantity,
        };
        if adding < quantity {
            info!(requested = quantity, adding, "Capped at stock");
        }

        let body = CartAdd {
            product_id: product.id.clone(),
            quantity: adding,
        };
        let snapshot = CartItem::from_product(product, adding);
        let operation = Operation::new("add_item", Target::Independent, move |api| {
            post_line(api, body, snapshot)
        });
        self.dispatch(operation).await
    }

    /// Sets the quantity of a line. More than the known stock is capped at the stock, and a
    /// quantity of zero or less (after capping) removes the line.
    #[instrument(skip(self))]
    pub async fn update_quantity(
        &self,
        id: &str,
        quantity: i64,
    ) -> Result<SliceState<CartItem>, CartError> {
        let known = self.inner.current().get(&id.to_string()).cloned();
        let requested = u32::try_from(quantity.max(0)).unwrap_or(u32::MAX);
        let quantity = known
            .as_ref()
            .map_or(requested, |line| line.clamp_to_stock(requested));
        if quantity == 0 {
            debug!("Nothing left of the line, removing it");
            return self.remove_item(id).await;
        }

        let id = id.to_string();
        let operation = Operation::new("update_quantity", Target::Entity(id.clone()), move |api| {
            put_quantity(api, id, CartQuantity { quantity }, known)
        });
        self.dispatch(operation).await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, id: &str) -> Result<SliceState<CartItem>, CartError> {
        debug!("Sending request");
        let id = id.to_string();
        let operation = Operation::new("remove_item", Target::Entity(id.clone()), move |api| {
            delete_line(api, id)
        });
        self.dispatch(operation).await
    }

    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<SliceState<CartItem>, CartError> {
        debug!("Sending request");
        self.dispatch(Operation::new("clear_cart", Target::Collection, clear_lines))
            .await
    }

    async fn dispatch(
        &self,
        operation: Operation<CartItem>,
    ) -> Result<SliceState<CartItem>, CartError> {
        self.inner
            .dispatch(operation)
            .await
            .map(|outcome| outcome.state)
            .map_err(CartError::from)
    }
}

#[async_trait]
impl StorePort<CartItem> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &SliceClient<CartItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        CartError::from(e)
    }
}
