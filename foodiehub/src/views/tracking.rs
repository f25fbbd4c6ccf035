//! Live order tracking
//!
//! Loads one order with its items and restaurant, subscribes to the
//! change feed for that row, and folds incoming updates into the held
//! order so the status timeline moves without manual refresh.

use std::sync::Arc;

use hub_client::{ClientResult, DataStore, DataStoreExt, Query, Subscription};
use shared::models::{Order, OrderItem, OrderStatus, Restaurant};
use shared::realtime::ChangeFilter;

use super::ViewState;

/// Everything the tracking screen needs, fetched in one pass
#[derive(Debug)]
pub struct TrackingPayload {
    pub order: Option<Order>,
    pub items: Vec<OrderItem>,
    pub restaurant: Option<Restaurant>,
    pub subscription: Option<Subscription>,
}

/// Order tracking view model
#[derive(Debug)]
pub struct TrackingView {
    store: Arc<dyn DataStore>,
    order_id: Option<String>,
    state: ViewState,
    order: Option<Order>,
    items: Vec<OrderItem>,
    restaurant: Option<Restaurant>,
    subscription: Option<Subscription>,
}

impl TrackingView {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            order_id: None,
            state: ViewState::Loading,
            order: None,
            items: Vec::new(),
            restaurant: None,
            subscription: None,
        }
    }

    /// Point the view at an order and reset to loading.
    ///
    /// Any previous subscription is dropped, which releases it.
    pub fn begin(&mut self, order_id: &str) {
        self.order_id = Some(order_id.to_string());
        self.state = ViewState::Loading;
        self.order = None;
        self.items.clear();
        self.restaurant = None;
        self.subscription = None;
    }

    /// Fetch the order, its items and restaurant.
    ///
    /// With `subscribe` set, also opens a change feed subscription for
    /// the order row; a failed subscribe degrades to manual refresh.
    pub async fn load(
        store: &Arc<dyn DataStore>,
        order_id: &str,
        subscribe: bool,
    ) -> ClientResult<TrackingPayload> {
        let order: Option<Order> = store.get_row("orders", order_id).await?;
        let items: Vec<OrderItem> = store
            .list_rows(&Query::table("order_items").eq("order_id", order_id))
            .await?;

        let restaurant = match &order {
            Some(order) => store.get_row("restaurants", &order.restaurant_id).await?,
            None => None,
        };

        let subscription = if subscribe && order.is_some() {
            match store.subscribe("orders", ChangeFilter::eq("id", order_id)).await {
                Ok(sub) => Some(sub),
                Err(e) => {
                    tracing::warn!("Live updates unavailable for order {}: {}", order_id, e);
                    None
                }
            }
        } else {
            None
        };

        Ok(TrackingPayload {
            order,
            items,
            restaurant,
            subscription,
        })
    }

    /// Install a fetched payload; late payloads for another order are
    /// dropped, releasing any subscription they carry.
    pub fn apply(&mut self, order_id: &str, payload: TrackingPayload) {
        if self.order_id.as_deref() != Some(order_id) {
            tracing::debug!("Dropping stale tracking payload for {}", order_id);
            return;
        }
        self.state = if payload.order.is_some() {
            ViewState::Ready
        } else {
            ViewState::NotFound
        };
        self.order = payload.order;
        self.items = payload.items;
        self.restaurant = payload.restaurant;
        // A refresh payload carries no subscription; keep the live one
        if payload.subscription.is_some() {
            self.subscription = payload.subscription;
        }
    }

    /// Begin, load with a live subscription, and apply in one await
    pub async fn activate(&mut self, order_id: &str) -> ClientResult<()> {
        self.begin(order_id);
        let payload = Self::load(&self.store, order_id, true).await?;
        self.apply(order_id, payload);
        Ok(())
    }

    /// Re-fetch the order without touching the subscription
    pub async fn refresh(&mut self) -> ClientResult<()> {
        let Some(order_id) = self.order_id.clone() else {
            return Ok(());
        };
        let payload = Self::load(&self.store, &order_id, false).await?;
        self.apply(&order_id, payload);
        Ok(())
    }

    /// Drain queued feed changes into the held order.
    ///
    /// Returns whether anything changed. Later changes win.
    pub fn poll_changes(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        let mut changed = false;
        while let Some(change) = subscription.try_next() {
            match serde_json::from_value::<Order>(change.row) {
                Ok(order) => {
                    tracing::info!(order_id = %order.id, status = %order.status, "Order update");
                    self.order = Some(order);
                    changed = true;
                }
                Err(e) => {
                    tracing::warn!("Skipping malformed order change: {}", e);
                }
            }
        }
        changed
    }

    /// Release the live subscription, telling the server to stop
    pub async fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            if let Err(e) = subscription.close().await {
                tracing::debug!("Subscription close failed: {}", e);
            }
        }
    }

    /// Detach the subscription so the caller can close it elsewhere
    pub fn take_subscription(&mut self) -> Option<Subscription> {
        self.subscription.take()
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }

    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn restaurant(&self) -> Option<&Restaurant> {
        self.restaurant.as_ref()
    }

    pub fn has_live_updates(&self) -> bool {
        self.subscription.is_some()
    }

    /// Fraction of the status progression reached, 0.0 outside it
    pub fn progress(&self) -> f64 {
        self.order
            .as_ref()
            .and_then(|order| order.status.position())
            .map(|position| (position + 1) as f64 / OrderStatus::PROGRESSION.len() as f64)
            .unwrap_or(0.0)
    }

    pub fn is_cancelled(&self) -> bool {
        self.order
            .as_ref()
            .is_some_and(|order| order.status.is_cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_client::MemoryStore;
    use serde_json::json;

    async fn seed_order(store: &Arc<dyn DataStore>, status: &str) -> String {
        let stored = store
            .insert(
                "orders",
                json!({
                    "customer_id": "u1",
                    "restaurant_id": "1",
                    "status": status,
                    "subtotal": 349.0,
                    "delivery_fee": 49.0,
                    "tax": 17.45,
                    "total": 415.45,
                    "delivery_address": "42 Garden Road",
                }),
            )
            .await
            .unwrap();
        let id = stored[0]["id"].as_str().unwrap().to_string();

        store
            .insert(
                "order_items",
                json!({
                    "order_id": id,
                    "name": "Butter Chicken",
                    "quantity": 1,
                    "unit_price": 349.0,
                    "total_price": 349.0,
                }),
            )
            .await
            .unwrap();
        id
    }

    #[tokio::test]
    async fn activate_loads_order_items_and_restaurant() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let id = seed_order(&store, "confirmed").await;

        let mut view = TrackingView::new(store);
        view.activate(&id).await.unwrap();

        assert_eq!(view.state(), ViewState::Ready);
        assert_eq!(view.order().unwrap().status, OrderStatus::Confirmed);
        assert_eq!(view.items().len(), 1);
        assert_eq!(view.restaurant().unwrap().name, "Spice Garden");
        assert!(view.has_live_updates());
        assert!((view.progress() - 2.0 / 6.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn status_updates_arrive_without_refresh() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let id = seed_order(&store, "preparing").await;

        let mut view = TrackingView::new(store.clone());
        view.activate(&id).await.unwrap();
        assert!(!view.poll_changes());

        store
            .update("orders", &id, json!({"status": "out_for_delivery"}))
            .await
            .unwrap();

        assert!(view.poll_changes());
        assert_eq!(view.order().unwrap().status, OrderStatus::OutForDelivery);
        assert!((view.progress() - 5.0 / 6.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn later_change_wins_when_several_queue_up() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let id = seed_order(&store, "pending").await;

        let mut view = TrackingView::new(store.clone());
        view.activate(&id).await.unwrap();

        store
            .update("orders", &id, json!({"status": "confirmed"}))
            .await
            .unwrap();
        store
            .update("orders", &id, json!({"status": "preparing"}))
            .await
            .unwrap();

        assert!(view.poll_changes());
        assert_eq!(view.order().unwrap().status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn refresh_keeps_the_subscription() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let id = seed_order(&store, "pending").await;

        let mut view = TrackingView::new(store.clone());
        view.activate(&id).await.unwrap();
        view.refresh().await.unwrap();
        assert!(view.has_live_updates());

        store
            .update("orders", &id, json!({"status": "confirmed"}))
            .await
            .unwrap();
        assert!(view.poll_changes());
    }

    #[tokio::test]
    async fn cancelled_order_reports_no_progress() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let id = seed_order(&store, "cancelled").await;

        let mut view = TrackingView::new(store);
        view.activate(&id).await.unwrap();

        assert!(view.is_cancelled());
        assert_eq!(view.progress(), 0.0);
    }

    #[tokio::test]
    async fn unknown_order_is_not_found_without_subscription() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let mut view = TrackingView::new(store);
        view.activate("nope").await.unwrap();

        assert_eq!(view.state(), ViewState::NotFound);
        assert!(!view.has_live_updates());
    }

    #[tokio::test]
    async fn close_stops_delivery() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let id = seed_order(&store, "pending").await;

        let mut view = TrackingView::new(store.clone());
        view.activate(&id).await.unwrap();
        view.close().await;
        assert!(!view.has_live_updates());

        store
            .update("orders", &id, json!({"status": "confirmed"}))
            .await
            .unwrap();
        assert!(!view.poll_changes());
    }
}
