//! Demo: browse the catalog, fill the cart and check out against a running backend.
//!
//! Reads `.env` if present. `DEMO_TOKEN` signs the session in before checkout.

use slice_framework::tracing::setup_tracing;
use slice_framework::StorePort;
use storefront::api::ListQuery;
use storefront::config::StorefrontConfig;
use storefront::lifecycle::Storefront;
use storefront::model::{PaymentMethod, ShippingAddress};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    dotenvy::dotenv().ok();
    setup_tracing();

    let config = StorefrontConfig::from_env().map_err(|e| e.to_string())?;
    info!(base_url = %config.api_base_url, "Starting storefront demo");
    let store = Storefront::connect(&config).map_err(|e| e.to_string())?;

    if let Ok(token) = std::env::var("DEMO_TOKEN") {
        store.session().sign_in(token);
    }

    let span = tracing::info_span!("browse");
    let products = async {
        store
            .categories
            .fetch_all_categories()
            .await
            .map_err(|e| e.to_string())?;
        store
            .products
            .fetch_products(ListQuery::page(1, 12).sort("-createdAt"))
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    info!(
        shown = products.len(),
        total = products.total_items(),
        categories = store.categories.state().len(),
        "Catalog loaded"
    );

    let span = tracing::info_span!("shopping");
    async {
        for product in products.items.iter().filter(|p| p.active && p.in_stock()).take(2) {
            match store.cart.add_item(product, 1).await {
                Ok(cart) => info!(
                    product = %product.id,
                    total_items = cart.summary.total_items,
                    total_price = cart.summary.total_price,
                    "Added to cart"
                ),
                Err(e) => warn!(product = %product.id, error = %e, "Could not add to cart"),
            }
        }
        if let Some(product) = products.items.first() {
            match store.favorites.toggle_favorite(product).await {
                Ok(now_favorite) => info!(product = %product.id, now_favorite, "Favorite toggled"),
                Err(e) => warn!(error = %e, "Could not toggle favorite"),
            }
        }
    }
    .instrument(span)
    .await;

    if store.session().is_authenticated() && !store.cart.state().is_empty() {
        let address = ShippingAddress {
            full_name: "Demo Shopper".to_string(),
            street: "1 Main Street".to_string(),
            city: "Springfield".to_string(),
            postal_code: "12345".to_string(),
            country: "US".to_string(),
            phone: None,
        };
        let span = tracing::info_span!("checkout");
        match store
            .checkout(address, PaymentMethod::CashOnDelivery)
            .instrument(span)
            .await
        {
            Ok(order) => info!(
                order = %order.id,
                total = order.total,
                status = %order.status,
                "Order placed"
            ),
            Err(e) => warn!(error = %e, "Checkout failed"),
        }
    } else {
        info!("Skipping checkout (no session or empty cart)");
    }

    store.shutdown().await.map_err(|e| e.to_string())?;
    Ok(())
}
