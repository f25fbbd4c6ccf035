//! End-to-end order flow against the in-memory backend
//!
//! Walks the path a customer actually takes: read the catalog, fill a
//! cart, check out, then watch the order move through the kitchen.

use std::sync::Arc;

use serde_json::json;

use foodiehub::OrderPricing;
use foodiehub::cart::{AddOutcome, CartCandidate, CartStore};
use foodiehub::views::checkout::{self, CheckoutError, CheckoutForm};
use foodiehub::views::tracking::TrackingView;
use hub_client::store::fixtures::DEMO_USER_ID;
use hub_client::{DataStore, DataStoreExt, MemoryStore, Query};
use shared::models::{MenuItem, Order, OrderItem, OrderStatus, Payment, Restaurant};

fn sample_store() -> Arc<dyn DataStore> {
    Arc::new(MemoryStore::with_sample_data())
}

async fn cart_from_catalog(store: &Arc<dyn DataStore>) -> CartStore {
    let restaurant: Restaurant = store.require_row("restaurants", "1").await.unwrap();
    let menu: Vec<MenuItem> = store
        .list_rows(&Query::table("menu_items").eq("restaurant_id", "1"))
        .await
        .unwrap();
    let butter_chicken = menu.iter().find(|i| i.name == "Butter Chicken").unwrap();
    let naan = menu.iter().find(|i| i.name == "Garlic Naan").unwrap();

    let mut cart = CartStore::in_memory();
    assert!(matches!(
        cart.add(CartCandidate::from_menu_item(butter_chicken, &restaurant)),
        AddOutcome::Added
    ));
    assert!(matches!(
        cart.add(CartCandidate::from_menu_item(butter_chicken, &restaurant)),
        AddOutcome::Merged
    ));
    assert!(matches!(
        cart.add(CartCandidate::from_menu_item(naan, &restaurant)),
        AddOutcome::Added
    ));
    cart
}

fn checkout_form() -> CheckoutForm {
    CheckoutForm {
        address: "42 Garden Road, Food District".to_string(),
        phone: "9876543210".to_string(),
        instructions: "Ring the bell twice".to_string(),
        coords: Some((12.9716, 77.5946)),
    }
}

#[tokio::test]
async fn browse_checkout_and_track_an_order() {
    let store = sample_store();
    let cart = cart_from_catalog(&store).await;
    assert_eq!(cart.item_count(), 3);
    let subtotal = cart.total();

    let pricing = OrderPricing::default();
    let order_id = checkout::place_order(
        &store,
        &pricing,
        Some(DEMO_USER_ID),
        &cart.snapshot(),
        &checkout_form(),
    )
    .await
    .unwrap();

    let order: Order = store.require_row("orders", &order_id).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.customer_id.as_deref(), Some(DEMO_USER_ID));
    assert!((order.subtotal - 757.0).abs() < 1e-9);
    assert!((order.total - pricing.total(subtotal)).abs() < 1e-9);
    assert_eq!(order.delivery_address, "42 Garden Road, Food District");
    assert!(order.estimated_delivery_time.is_some());

    let items: Vec<OrderItem> = store
        .list_rows(&Query::table("order_items").eq("order_id", order_id.as_str()))
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    let chicken = items.iter().find(|i| i.name == "Butter Chicken").unwrap();
    assert_eq!(chicken.quantity, 2);
    assert!((chicken.total_price - 698.0).abs() < 1e-9);

    let payments: Vec<Payment> = store
        .list_rows(&Query::table("payments").eq("order_id", order_id.as_str()))
        .await
        .unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].payment_method, "cash_on_delivery");
    assert!((payments[0].amount - order.total).abs() < 1e-9);

    // Track it live: a backend status change lands without a refresh
    let mut tracking = TrackingView::new(store.clone());
    tracking.activate(&order_id).await.unwrap();
    assert!(tracking.has_live_updates());
    assert!((tracking.progress() - 1.0 / 6.0).abs() < 1e-9);

    store
        .update("orders", &order_id, json!({"status": "out_for_delivery"}))
        .await
        .unwrap();
    assert!(tracking.poll_changes());
    assert_eq!(
        tracking.order().map(|o| o.status),
        Some(OrderStatus::OutForDelivery)
    );
    assert!((tracking.progress() - 5.0 / 6.0).abs() < 1e-9);

    tracking.close().await;
}

#[tokio::test]
async fn a_bad_form_never_reaches_the_backend() {
    let store = sample_store();
    let cart = cart_from_catalog(&store).await;
    let pricing = OrderPricing::default();

    let mut form = checkout_form();
    form.address = "  ".to_string();
    let err = checkout::place_order(&store, &pricing, Some(DEMO_USER_ID), &cart.snapshot(), &form)
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::EmptyAddress));

    let err = checkout::place_order(&store, &pricing, None, &cart.snapshot(), &checkout_form())
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::NotSignedIn));

    let orders: Vec<Order> = store.list_rows(&Query::table("orders")).await.unwrap();
    assert!(orders.is_empty());
    // The cart survives failed attempts untouched
    assert_eq!(cart.item_count(), 3);
}
