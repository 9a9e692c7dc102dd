use serde_json::{json, Value};
use slice_framework::{ApiError, StorePort, NO_CONNECTION_MESSAGE, SESSION_EXPIRED_MESSAGE};
use std::sync::Arc;
use std::time::Duration;
use storefront::api::mock::MockTransport;
use storefront::api::{ListQuery, Method, SessionStatus};
use storefront::config::StorefrontConfig;
use storefront::lifecycle::Storefront;
use storefront::model::{
    CartItem, OrderStatus, PaymentMethod, Product, ProductCreate, ProductUpdate, ShippingAddress,
};
use storefront::order_slice::OrderError;
use storefront::product_slice::ProductError;
use storefront::promo_code_slice::PromoCodeError;
use storefront::user_slice::UserError;

fn start(transport: &Arc<MockTransport>) -> Storefront {
    Storefront::with_transport(transport.clone(), &StorefrontConfig::default())
}

fn product_json(id: &str, price: f64) -> Value {
    json!({ "_id": id, "name": format!("Product {id}"), "price": price, "stock": 5 })
}

fn product(id: &str, price: f64) -> Product {
    serde_json::from_value(product_json(id, price)).unwrap()
}

fn order_json(id: &str, status: &str, total: f64) -> Value {
    json!({
        "_id": id,
        "items": [{ "productId": "p1", "name": "Lamp", "price": 12.5, "quantity": 2 }],
        "status": status,
        "totalAmount": total
    })
}

fn address() -> ShippingAddress {
    ShippingAddress {
        full_name: "Ann Lee".to_string(),
        street: "1 Main Street".to_string(),
        city: "Springfield".to_string(),
        postal_code: "12345".to_string(),
        country: "US".to_string(),
        phone: None,
    }
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn test_adding_a_favorite_twice_keeps_one_row() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Post, "/api/favorites")
        .with_body(json!({ "productId": "p1" }))
        .return_json(201, json!({ "message": "Added to favorites" }));
    let store = start(&transport);
    let lamp = product("p1", 20.0);

    store.favorites.add_favorite(&lamp).await.unwrap();
    let favorites = store.favorites.add_favorite(&lamp).await.unwrap();

    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites.items[0].name, "Product p1");
    assert_eq!(transport.received().len(), 1);
    transport.verify();
}

#[tokio::test]
async fn test_optimistic_favorite_removal_rolls_back() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/favorites")
        .return_json(200, json!([{ "_id": "p1", "name": "Lamp", "price": 20.0 }]));
    transport
        .expect(Method::Delete, "/api/favorites/p1")
        .after(Duration::from_millis(50))
        .return_json(503, json!({ "message": "Try again later" }));
    let store = start(&transport);
    store.favorites.fetch_favorites().await.unwrap();

    let mut watch = store.favorites.subscribe();
    let favorites = store.favorites.clone();
    let removal = tokio::spawn(async move { favorites.remove_favorite("p1").await });

    let during = watch.wait_for(|state| state.loading).await.unwrap().clone();
    assert!(during.is_empty());

    assert!(removal.await.unwrap().is_err());
    let after = store.favorites.state();
    assert!(after.contains(&"p1".to_string()));
    assert_eq!(after.error.as_deref(), Some("Try again later"));
    transport.verify();
}

#[tokio::test]
async fn test_refused_removal_restores_favorite_after_other_add() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/favorites")
        .return_json(200, json!([{ "_id": "p1", "name": "Lamp", "price": 20.0 }]));
    transport
        .expect(Method::Delete, "/api/favorites/p1")
        .after(Duration::from_millis(100))
        .return_json(503, json!({ "message": "Try again later" }));
    transport
        .expect(Method::Post, "/api/favorites")
        .return_json(201, json!({ "_id": "p2", "name": "Mug", "price": 8.0 }));
    let store = start(&transport);
    store.favorites.fetch_favorites().await.unwrap();

    let mut watch = store.favorites.subscribe();
    let favorites = store.favorites.clone();
    let removal = tokio::spawn(async move { favorites.remove_favorite("p1").await });
    watch.wait_for(|state| state.loading).await.unwrap();

    store.favorites.add_favorite(&product("p2", 8.0)).await.unwrap();
    assert!(removal.await.unwrap().is_err());

    let ids: Vec<String> = store
        .favorites
        .state()
        .items
        .iter()
        .map(|favorite| favorite.id.clone())
        .collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    transport.verify();
}

#[tokio::test]
async fn test_toggle_favorite() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Post, "/api/favorites")
        .return_json(201, json!({ "_id": "p1", "name": "Lamp", "price": 20.0 }));
    transport.expect(Method::Delete, "/api/favorites/p1").return_status(200);
    let store = start(&transport);
    let lamp = product("p1", 20.0);

    assert!(store.favorites.toggle_favorite(&lamp).await.unwrap());
    assert!(store.favorites.is_favorite("p1"));
    assert!(!store.favorites.toggle_favorite(&lamp).await.unwrap());
    assert!(store.favorites.state().is_empty());
    transport.verify();
}

// =============================================================================
// Products (paginated admin slice)
// =============================================================================

#[tokio::test]
async fn test_paginated_delete_updates_total_and_selection() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/products")
        .with_query("page", "1")
        .with_query("limit", "2")
        .return_json(
            200,
            json!({ "items": [product_json("p1", 10.0), product_json("p2", 20.0)], "total": 5 }),
        );
    transport
        .expect(Method::Get, "/api/products/p1")
        .return_json(200, product_json("p1", 10.0));
    transport.expect(Method::Delete, "/api/products/p1").return_status(200);
    let store = start(&transport);

    let page = store.products.fetch_products(ListQuery::page(1, 2)).await.unwrap();
    assert_eq!(page.total_items(), 5);
    assert_eq!(page.pagination.map(|p| p.total_pages), Some(3));

    store.products.fetch_product("p1").await.unwrap();
    assert_eq!(store.products.state().selected.map(|p| p.id), Some("p1".to_string()));

    store.products.delete_product("p1").await.unwrap();
    let state = store.products.state();
    assert_eq!(state.total_items(), 4);
    assert!(!state.contains(&"p1".to_string()));
    assert!(state.selected.is_none());
    transport.verify();
}

#[tokio::test]
async fn test_create_prepends_and_update_patches_selection() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/products")
        .return_json(200, json!({ "data": [product_json("p1", 10.0)], "total": 1 }));
    transport
        .expect(Method::Post, "/api/products")
        .return_json(201, product_json("p2", 30.0));
    transport
        .expect(Method::Get, "/api/products/p1")
        .return_json(200, product_json("p1", 10.0));
    transport
        .expect(Method::Put, "/api/products/p1")
        .with_body(json!({ "price": 12.0 }))
        .return_json(200, product_json("p1", 12.0));
    let store = start(&transport);

    store.products.fetch_products(ListQuery::page(1, 10)).await.unwrap();
    let created = store
        .products
        .create_product(ProductCreate {
            name: "Product p2".to_string(),
            description: String::new(),
            price: 30.0,
            category: None,
            stock: 5,
            images: Vec::new(),
            active: true,
        })
        .await
        .unwrap();
    assert_eq!(created.id, "p2");
    let state = store.products.state();
    assert_eq!(state.items[0].id, "p2");
    assert_eq!(state.total_items(), 2);

    store.products.fetch_product("p1").await.unwrap();
    store
        .products
        .update_product(
            "p1",
            ProductUpdate {
                price: Some(12.0),
                ..ProductUpdate::default()
            },
        )
        .await
        .unwrap();
    let state = store.products.state();
    assert_eq!(state.get(&"p1".to_string()).map(|p| p.price), Some(12.0));
    assert_eq!(state.selected.map(|p| p.price), Some(12.0));
    transport.verify();
}

#[tokio::test]
async fn test_filters_pass_through_to_server() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/products")
        .with_query("category", "lighting")
        .with_query("search", "lamp")
        .with_query("sort", "-price")
        .return_json(200, json!([product_json("p9", 99.0)]));
    let store = start(&transport);

    let query = ListQuery::page(1, 20)
        .search("lamp")
        .sort("-price")
        .filter("category", "lighting");
    let state = store.products.fetch_products(query).await.unwrap();

    assert_eq!(state.len(), 1);
    assert_eq!(state.filters.get("category").map(String::as_str), Some("lighting"));
    assert_eq!(state.filters.get("search").map(String::as_str), Some("lamp"));
    transport.verify();
}

#[tokio::test]
async fn test_stale_list_response_is_discarded() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/products")
        .with_query("page", "1")
        .after(Duration::from_millis(100))
        .return_json(200, json!({ "items": [product_json("old", 1.0)], "total": 40 }));
    transport
        .expect(Method::Get, "/api/products")
        .with_query("page", "2")
        .return_json(200, json!({ "items": [product_json("new", 2.0)], "total": 40 }));
    let store = start(&transport);

    let mut watch = store.products.subscribe();
    let products = store.products.clone();
    let first = tokio::spawn(async move { products.fetch_products(ListQuery::page(1, 20)).await });
    watch.wait_for(|state| state.loading).await.unwrap();

    let second = store.products.fetch_products(ListQuery::page(2, 20)).await.unwrap();
    assert_eq!(second.items[0].id, "new");

    let first = first.await.unwrap();
    assert!(matches!(first, Err(ProductError::Superseded(_))));
    let state = store.products.state();
    assert_eq!(state.items[0].id, "new");
    assert_eq!(state.pagination.map(|p| p.page), Some(2));
    assert!(!state.loading);
    assert_eq!(state.error, None);
    transport.verify();
}

#[tokio::test]
async fn test_missing_product_maps_to_not_found() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/products/nope")
        .return_json(404, json!({ "message": "Product not found" }));
    let store = start(&transport);

    let result = store.products.fetch_product("nope").await;

    assert_eq!(result.unwrap_err(), ProductError::NotFound("Product not found".to_string()));
    assert_eq!(store.products.state().error.as_deref(), Some("Product not found"));
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_stores_server_echo_not_client_total() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Post, "/api/orders")
        .return_json(201, order_json("o1", "pending", 30.0));
    let store = start(&transport);
    let items = vec![CartItem {
        id: "p1".to_string(),
        name: "Lamp".to_string(),
        price: 12.5,
        image: None,
        quantity: 2,
        stock: None,
    }];

    let order = store
        .orders
        .place_order(&items, address(), PaymentMethod::Card)
        .await
        .unwrap();

    assert_eq!(order.total, 30.0);
    let sent = transport.received()[0].body.clone().unwrap();
    assert_eq!(sent["totalAmount"], json!(25.0));
    let state = store.orders.state();
    assert_eq!(state.items[0].total, 30.0);
    assert_eq!(state.summary.revenue, 30.0);
    transport.verify();
}

#[tokio::test]
async fn test_empty_order_is_refused() {
    let transport = Arc::new(MockTransport::new());
    let store = start(&transport);

    let result = store.orders.place_order(&[], address(), PaymentMethod::Card).await;

    assert_eq!(result.unwrap_err(), OrderError::EmptyOrder);
    assert!(transport.received().is_empty());
}

#[tokio::test]
async fn test_order_status_follows_lifecycle() {
    let transport = Arc::new(MockTransport::new());
    transport.expect(Method::Get, "/api/orders").return_json(
        200,
        json!([order_json("o1", "pending", 25.0), order_json("o2", "delivered", 40.0)]),
    );
    transport
        .expect(Method::Patch, "/api/orders/o1/status")
        .with_body(json!({ "status": "processing" }))
        .return_json(200, order_json("o1", "processing", 25.0));
    let store = start(&transport);
    store.orders.fetch_orders(ListQuery::default()).await.unwrap();

    let refused = store.orders.cancel_order("o2").await;
    assert!(matches!(refused, Err(OrderError::InvalidTransition(_))));
    assert_eq!(transport.received().len(), 1);

    let order = store
        .orders
        .update_order_status("o1", OrderStatus::Processing)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Processing);
    let state = store.orders.state();
    assert_eq!(state.get(&"o1".to_string()).map(|o| o.status), Some(OrderStatus::Processing));
    assert_eq!(state.summary.orders, 2);
    transport.verify();
}

#[tokio::test]
async fn test_checkout_places_order_and_empties_cart() {
    let transport = Arc::new(MockTransport::new());
    transport.expect(Method::Get, "/api/cart").return_json(
        200,
        json!([{ "_id": "p1", "name": "Lamp", "price": 12.5, "quantity": 2 }]),
    );
    transport
        .expect(Method::Post, "/api/orders")
        .return_json(201, order_json("o7", "pending", 25.0));
    transport.expect(Method::Delete, "/api/cart").return_status(200);
    let store = start(&transport);

    store.cart.fetch_cart().await.unwrap();
    let order = store
        .checkout(address(), PaymentMethod::CashOnDelivery)
        .await
        .unwrap();

    assert_eq!(order.id, "o7");
    assert!(store.cart.state().is_empty());
    assert_eq!(store.orders.state().len(), 1);
    transport.verify();
}

// =============================================================================
// Users, reviews, promo codes
// =============================================================================

#[tokio::test]
async fn test_block_user_checks_current_status() {
    let transport = Arc::new(MockTransport::new());
    transport.expect(Method::Get, "/api/users").return_json(
        200,
        json!([{ "_id": "u1", "name": "Ann", "email": "ann@example.com", "status": "blocked" }]),
    );
    transport
        .expect(Method::Patch, "/api/users/u1/status")
        .with_body(json!({ "status": "active" }))
        .return_json(
            200,
            json!({ "_id": "u1", "name": "Ann", "email": "ann@example.com", "status": "active" }),
        );
    let store = start(&transport);
    store.users.fetch_users(ListQuery::default()).await.unwrap();

    assert!(matches!(
        store.users.block_user("u1").await,
        Err(UserError::InvalidTransition(_))
    ));
    let user = store.users.activate_user("u1").await.unwrap();
    assert_eq!(user.status, storefront::model::UserStatus::Active);
    transport.verify();
}

#[tokio::test]
async fn test_product_reviews_are_filtered_and_averaged() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/reviews")
        .with_query("productId", "p1")
        .return_json(
            200,
            json!({
                "data": [
                    { "_id": "r1", "product": "p1", "rating": 5, "status": "approved" },
                    { "_id": "r2", "product": "p1", "rating": 2, "status": "pending" }
                ],
                "total": 2
            }),
        );
    transport
        .expect(Method::Patch, "/api/reviews/r2/status")
        .with_body(json!({ "status": "approved" }))
        .return_json(
            200,
            json!({ "_id": "r2", "product": "p1", "rating": 2, "status": "approved" }),
        );
    let store = start(&transport);

    let reviews = store
        .reviews
        .fetch_product_reviews("p1", ListQuery::page(1, 10))
        .await
        .unwrap();
    assert_eq!(reviews.summary.count, 2);
    assert_eq!(reviews.summary.average_rating, 3.5);
    assert_eq!(reviews.filters.get("productId").map(String::as_str), Some("p1"));

    store.reviews.approve_review("r2").await.unwrap();
    transport.verify();
}

#[tokio::test]
async fn test_promo_code_validation() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Post, "/api/promo-codes/validate")
        .with_body(json!({ "code": "OLD", "orderAmount": 80.0 }))
        .return_json(
            422,
            json!({ "message": "Invalid promo code", "errors": { "code": "Code expired" } }),
        );
    transport
        .expect(Method::Post, "/api/promo-codes/validate")
        .with_body(json!({ "code": "SPRING", "orderAmount": 80.0 }))
        .return_json(
            200,
            json!({
                "promoCode": {
                    "_id": "pc1",
                    "code": "SPRING",
                    "discountType": "percentage",
                    "discountValue": 10
                },
                "discount": 8.0
            }),
        );
    let store = start(&transport);

    let refused = store.promo_codes.validate_code(" OLD ", 80.0).await.unwrap_err();
    assert!(matches!(refused, PromoCodeError::Api(ApiError::Validation { .. })));
    assert_eq!(
        refused.field_errors().get("code").map(String::as_str),
        Some("Code expired")
    );
    let state = store.promo_codes.state();
    assert_eq!(state.error.as_deref(), Some("Invalid promo code"));
    assert_eq!(state.field_errors.get("code").map(String::as_str), Some("Code expired"));

    let discount = store.promo_codes.validate_code("SPRING", 80.0).await.unwrap();
    assert_eq!(discount, 8.0);
    let state = store.promo_codes.state();
    assert_eq!(state.selected.map(|code| code.code), Some("SPRING".to_string()));
    assert!(state.field_errors.is_empty());
    assert_eq!(state.error, None);
    transport.verify();
}

// =============================================================================
// Session, network and lifecycle
// =============================================================================

#[tokio::test]
async fn test_unauthorized_response_expires_session() {
    let transport = Arc::new(MockTransport::new());
    transport.expect(Method::Get, "/api/orders").return_status(401);
    let store = start(&transport);
    store.session().sign_in("expired-token");

    let result = store.orders.fetch_orders(ListQuery::default()).await;

    assert_eq!(result.unwrap_err(), OrderError::Api(ApiError::Unauthorized));
    assert_eq!(transport.received()[0].bearer.as_deref(), Some("expired-token"));
    assert!(!store.session().is_authenticated());
    assert_eq!(
        store.session().status(),
        SessionStatus::Expired {
            redirect_to: "/login".to_string()
        }
    );
    assert_eq!(store.orders.state().error.as_deref(), Some(SESSION_EXPIRED_MESSAGE));
}

#[tokio::test]
async fn test_network_failure_uses_fixed_message() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/categories")
        .return_network_error("connection refused");
    let store = start(&transport);

    assert!(store.categories.fetch_all_categories().await.is_err());

    let state = store.categories.state();
    assert_eq!(state.error.as_deref(), Some(NO_CONNECTION_MESSAGE));
    assert!(!state.loading);
}

#[tokio::test]
async fn test_sign_out_forgets_user_state() {
    let transport = Arc::new(MockTransport::new());
    transport
        .expect(Method::Get, "/api/cart")
        .return_json(200, json!([{ "_id": "p1", "name": "Lamp", "price": 12.5, "quantity": 1 }]));
    let store = start(&transport);
    store.session().sign_in("token");
    store.cart.fetch_cart().await.unwrap();

    store.sign_out().await.unwrap();

    assert!(store.cart.snapshot().await.unwrap().is_empty());
    assert_eq!(store.session().status(), SessionStatus::Anonymous);
}

#[tokio::test]
async fn test_shutdown_stops_every_slice() {
    let transport = Arc::new(MockTransport::new());
    let store = start(&transport);

    store.shutdown().await.unwrap();
}
