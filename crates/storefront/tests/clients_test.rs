//! Typed clients against mocked slices.
//!
//! These check what a client decides before anything reaches a real slice: local
//! refusals, which operation gets dispatched and with which target.

use serde_json::json;
use slice_framework::mock::{create_mock_client, expect_apply, expect_dispatch, MockSlice};
use slice_framework::{Fold, SliceState, Strategy, Target};
use storefront::cart_slice::CartError;
use storefront::clients::{CartClient, FavoritesClient, OrderClient, PromoCodeClient};
use storefront::model::{
    CartItem, Favorite, InvalidTransition, Order, PaymentMethod, Product, PromoCode,
    ShippingAddress,
};
use storefront::order_slice::OrderError;

fn product(value: serde_json::Value) -> Product {
    serde_json::from_value(value).unwrap()
}

fn cart_line(id: &str, quantity: u32, stock: Option<u32>) -> CartItem {
    CartItem {
        id: id.to_string(),
        name: format!("Product {id}"),
        price: 10.0,
        image: None,
        quantity,
        stock,
    }
}

fn favorite(id: &str) -> Favorite {
    serde_json::from_value(json!({ "_id": id, "name": "Lamp", "price": 20.0 })).unwrap()
}

fn order(id: &str, status: &str) -> Order {
    serde_json::from_value(json!({
        "_id": id,
        "items": [{ "productId": "p1", "name": "Lamp", "price": 12.5, "quantity": 2 }],
        "status": status,
        "totalAmount": 25.0
    }))
    .unwrap()
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_zero_unit_add_dispatches_nothing() {
    let mock = MockSlice::<CartItem>::new();
    let cart = CartClient::new(mock.client());
    let lamp = product(json!({ "_id": "p1", "name": "Lamp", "price": 10.0, "stock": 3 }));

    let result = cart.add_item(&lamp, 0).await;

    assert_eq!(result.unwrap_err(), CartError::InvalidQuantity(0));
    assert!(mock.dispatched().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_add_without_known_stock_is_not_capped() {
    let mock = MockSlice::<CartItem>::new();
    mock.expect_dispatch("add_item")
        .return_ok(Fold::Merge(cart_line("p1", 7, None)));
    let cart = CartClient::new(mock.client());
    let lamp = product(json!({ "_id": "p1", "name": "Lamp", "price": 10.0 }));

    let state = cart.add_item(&lamp, 7).await.unwrap();

    assert_eq!(state.items[0].quantity, 7);
    assert_eq!(mock.dispatched(), vec!["add_item"]);
    mock.verify();
}

#[tokio::test]
async fn test_quantity_capped_to_zero_removes_the_line() {
    let mock = MockSlice::with_state(SliceState::with_items(vec![cart_line("p1", 2, Some(0))]));
    mock.expect_dispatch("remove_item")
        .return_ok(Fold::Remove("p1".to_string()));
    let cart = CartClient::new(mock.client());

    let state = cart.update_quantity("p1", 1).await.unwrap();

    assert!(state.is_empty());
    assert_eq!(mock.dispatched(), vec!["remove_item"]);
    mock.verify();
}

#[tokio::test]
async fn test_cart_add_is_an_independent_pessimistic_operation() {
    let (client, mut receiver) = create_mock_client::<CartItem>(4);
    let cart = CartClient::new(client);
    let lamp = product(json!({ "_id": "p1", "name": "Lamp", "price": 10.0, "stock": 3 }));

    let task = tokio::spawn(async move { cart.add_item(&lamp, 2).await });
    let (operation, respond_to) = expect_dispatch(&mut receiver).await.unwrap();

    assert_eq!(operation.label(), "add_item");
    assert_eq!(operation.target(), &Target::Independent);
    assert!(matches!(operation.strategy(), Strategy::Pessimistic));

    drop(respond_to);
    assert!(matches!(
        task.await.unwrap(),
        Err(CartError::SliceCommunicationError(_))
    ));
}

// =============================================================================
// Favorites
// =============================================================================

#[tokio::test]
async fn test_known_favorite_is_not_sent_again() {
    let mock = MockSlice::with_state(SliceState::with_items(vec![favorite("p1")]));
    let favorites = FavoritesClient::new(mock.client());
    let lamp = product(json!({ "_id": "p1", "name": "Lamp", "price": 20.0 }));

    let state = favorites.add_favorite(&lamp).await.unwrap();

    assert_eq!(state.len(), 1);
    assert!(mock.dispatched().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_favorite_removal_is_optimistic() {
    let (client, mut receiver) = create_mock_client::<Favorite>(4);
    let favorites = FavoritesClient::new(client);

    let task = tokio::spawn(async move { favorites.remove_favorite("p1").await });
    let (operation, _respond_to) = expect_dispatch(&mut receiver).await.unwrap();

    assert_eq!(operation.target(), &Target::Entity("p1".to_string()));
    assert!(matches!(
        operation.strategy(),
        Strategy::Optimistic(Fold::Remove(id)) if id == "p1"
    ));
    task.abort();
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_delivered_order_cannot_be_cancelled() {
    let mock = MockSlice::with_state(SliceState::with_items(vec![order("o1", "delivered")]));
    let orders = OrderClient::new(mock.client());

    let result = orders.cancel_order("o1").await;

    assert_eq!(
        result.unwrap_err(),
        OrderError::InvalidTransition(InvalidTransition {
            from: "delivered".to_string(),
            to: "cancelled".to_string(),
        })
    );
    assert!(mock.dispatched().is_empty());
    mock.verify();
}

#[tokio::test]
async fn test_unknown_order_status_is_left_to_the_server() {
    let mock = MockSlice::<Order>::new();
    mock.expect_dispatch("set_status")
        .return_ok(Fold::Splice(order("o9", "cancelled")));
    let orders = OrderClient::new(mock.client());

    let cancelled = orders.cancel_order("o9").await.unwrap();

    assert_eq!(cancelled.id, "o9");
    mock.verify();
}

#[tokio::test]
async fn test_empty_cart_places_no_order() {
    let mock = MockSlice::<Order>::new();
    let orders = OrderClient::new(mock.client());

    let result = orders
        .place_order(&[], ShippingAddress::default(), PaymentMethod::CashOnDelivery)
        .await;

    assert_eq!(result.unwrap_err(), OrderError::EmptyOrder);
    assert!(mock.dispatched().is_empty());
}

// =============================================================================
// Promo codes
// =============================================================================

#[tokio::test]
async fn test_clearing_the_applied_code_is_local() {
    let (client, mut receiver) = create_mock_client::<PromoCode>(4);
    let promo_codes = PromoCodeClient::new(client);

    let task = tokio::spawn(async move { promo_codes.clear_applied_code().await });
    let (fold, respond_to) = expect_apply(&mut receiver).await.unwrap();

    assert!(matches!(fold, Fold::Select(None)));
    respond_to.send(Ok(SliceState::default())).unwrap();
    task.await.unwrap().unwrap();
}
