use crate::api::http::HttpTransport;
use crate::api::{routes, ApiClient, AuthSession, ResourceApi, Transport, TransportError};
use crate::cart_slice::CartError;
use crate::clients::crud::RestEntity;
use crate::clients::{
    CartClient, CategoryClient, FavoritesClient, OrderClient, ProductClient, PromoCodeClient,
    ReviewClient, UserClient,
};
use crate::config::StorefrontConfig;
use crate::model::{Order, PaymentMethod, ShippingAddress};
use crate::order_slice::OrderError;
use crate::{
    cart_slice, category_slice, favorites_slice, order_slice, product_slice, promo_code_slice,
    review_slice, user_slice,
};
use slice_framework::{FrameworkError, SliceActor, StorePort};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// Errors raised while starting, using or stopping the storefront as a whole.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("Transport setup failed: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error("Slice error: {0}")]
    Slice(#[from] FrameworkError),

    /// A slice task panicked or was cancelled.
    #[error("Slice task failed: {0}")]
    TaskFailed(String),
}

/// The store: every slice running in its own task, wired to one REST client.
///
/// # Example
///
/// ```ignore
/// let config = StorefrontConfig::from_env()?;
/// let store = Storefront::connect(&config)?;
///
/// store.products.fetch_products(ListQuery::page(1, 20)).await?;
/// store.cart.add_item(&product, 2).await?;
///
/// store.shutdown().await?;
/// ```
pub struct Storefront {
    pub cart: CartClient,
    pub favorites: FavoritesClient,
    pub products: ProductClient,
    pub categories: CategoryClient,
    pub orders: OrderClient,
    pub users: UserClient,
    pub reviews: ReviewClient,
    pub promo_codes: PromoCodeClient,

    session: AuthSession,

    /// Task handles of all slices, awaited on shutdown
    handles: Vec<JoinHandle<()>>,
}

impl Storefront {
    /// Starts the store against the HTTP backend named in `config`.
    pub fn connect(config: &StorefrontConfig) -> Result<Self, LifecycleError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Starts the store on any [`Transport`], e.g. a
    /// [`MockTransport`](crate::api::mock::MockTransport) in tests.
    pub fn with_transport(transport: Arc<dyn Transport>, config: &StorefrontConfig) -> Self {
        let session = AuthSession::new(config.login_path.clone());
        let api = ApiClient::new(transport, session.clone());
        let buffer = config.slice_buffer_size;
        let mut handles = Vec::with_capacity(8);

        let (actor, cart) = cart_slice::new(buffer);
        handles.push(spawn(actor, &api, routes::CART));

        let (actor, favorites) = favorites_slice::new(buffer);
        handles.push(spawn(actor, &api, routes::FAVORITES));

        let (actor, products) = product_slice::new(buffer);
        handles.push(spawn(actor, &api, routes::PRODUCTS));

        let (actor, categories) = category_slice::new(buffer);
        handles.push(spawn(actor, &api, routes::CATEGORIES));

        let (actor, orders) = order_slice::new(buffer);
        handles.push(spawn(actor, &api, routes::ORDERS));

        let (actor, users) = user_slice::new(buffer);
        handles.push(spawn(actor, &api, routes::USERS));

        let (actor, reviews) = review_slice::new(buffer);
        handles.push(spawn(actor, &api, routes::REVIEWS));

        let (actor, promo_codes) = promo_code_slice::new(buffer);
        handles.push(spawn(actor, &api, routes::PROMO_CODES));

        info!(slices = handles.len(), base_url = %config.api_base_url, "Storefront started");
        Self {
            cart,
            favorites,
            products,
            categories,
            orders,
            users,
            reviews,
            promo_codes,
            session,
            handles,
        }
    }

    /// The session shared by every request. Sign in here; watch it to learn when the
    /// server expired the token.
    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Places an order for everything in the cart, then empties the cart.
    ///
    /// The order slice stores the server's echo of the order, including the total the
    /// server computed.
    #[instrument(skip(self, address))]
    pub async fn checkout(
        &self,
        address: ShippingAddress,
        payment: PaymentMethod,
    ) -> Result<Order, LifecycleError> {
        let items = self.cart.snapshot().await?.items;
        let order = self.orders.place_order(&items, address, payment).await?;
        self.cart.clear_cart().await?;
        Ok(order)
    }

    /// Drops the token and forgets everything that belonged to the signed-in user.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> Result<(), LifecycleError> {
        self.session.sign_out();
        self.cart.inner().reset().await?;
        self.favorites.inner().reset().await?;
        self.orders.inner().reset().await?;
        info!("Signed out");
        Ok(())
    }

    /// Stops every slice and waits for its task to finish.
    ///
    /// Dropping the clients closes the mailboxes; each slice drains what is queued and
    /// exits. Clones of the clients held elsewhere keep their slice alive, so drop them
    /// first.
    pub async fn shutdown(self) -> Result<(), LifecycleError> {
        info!("Shutting down storefront...");
        drop(self.cart);
        drop(self.favorites);
        drop(self.products);
        drop(self.categories);
        drop(self.orders);
        drop(self.users);
        drop(self.reviews);
        drop(self.promo_codes);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Slice task failed: {:?}", e);
                return Err(LifecycleError::TaskFailed(e.to_string()));
            }
        }

        info!("Storefront shutdown complete.");
        Ok(())
    }
}

fn spawn<T: RestEntity>(actor: SliceActor<T>, api: &ApiClient, route: &str) -> JoinHandle<()> {
    tokio::spawn(actor.run(ResourceApi::new(api.clone(), route)))
}
