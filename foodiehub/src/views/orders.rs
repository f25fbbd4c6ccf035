//! Order history
//!
//! Lists the signed-in customer's orders newest first, with restaurant
//! names resolved for display.

use std::collections::HashMap;
use std::sync::Arc;

use hub_client::{ClientResult, DataStore, DataStoreExt, Query};
use shared::models::{Order, Restaurant};

/// One history row
#[derive(Debug)]
pub struct OrderEntry {
    pub order: Order,
    /// `None` when the restaurant row is gone
    pub restaurant_name: Option<String>,
}

/// Order history view model
#[derive(Debug)]
pub struct OrdersView {
    store: Arc<dyn DataStore>,
    entries: Vec<OrderEntry>,
    loading: bool,
}

impl OrdersView {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            entries: Vec::new(),
            loading: false,
        }
    }

    /// Fetch the customer's orders, newest first, with restaurant names
    pub async fn load(
        store: &Arc<dyn DataStore>,
        customer_id: &str,
    ) -> ClientResult<Vec<OrderEntry>> {
        let orders: Vec<Order> = store
            .list_rows(
                &Query::table("orders")
                    .eq("customer_id", customer_id)
                    .order_desc("created_at"),
            )
            .await?;

        // One lookup per distinct restaurant; a missing or failed row
        // degrades to a nameless entry instead of failing the list.
        let mut names: HashMap<String, Option<String>> = HashMap::new();
        let mut entries = Vec::with_capacity(orders.len());
        for order in orders {
            let name = match names.get(&order.restaurant_id) {
                Some(name) => name.clone(),
                None => {
                    let fetched: Option<Restaurant> =
                        match store.get_row("restaurants", &order.restaurant_id).await {
                            Ok(row) => row,
                            Err(e) => {
                                tracing::warn!(
                                    "Could not resolve restaurant {}: {}",
                                    order.restaurant_id,
                                    e
                                );
                                None
                            }
                        };
                    let name = fetched.map(|r| r.name);
                    names.insert(order.restaurant_id.clone(), name.clone());
                    name
                }
            };
            entries.push(OrderEntry {
                order,
                restaurant_name: name,
            });
        }
        Ok(entries)
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
        self.entries.clear();
    }

    pub fn apply(&mut self, entries: Vec<OrderEntry>) {
        self.loading = false;
        self.entries = entries;
    }

    /// Load and apply in one await
    pub async fn fetch(&mut self, customer_id: &str) -> ClientResult<()> {
        self.set_loading();
        let entries = Self::load(&self.store, customer_id).await?;
        self.apply(entries);
        Ok(())
    }

    pub fn entries(&self) -> &[OrderEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_client::MemoryStore;
    use serde_json::json;
    use shared::models::OrderStatus;

    async fn seed_order(
        store: &Arc<dyn DataStore>,
        customer: &str,
        restaurant: &str,
        status: &str,
        created_at: &str,
    ) {
        store
            .insert(
                "orders",
                json!({
                    "customer_id": customer,
                    "restaurant_id": restaurant,
                    "status": status,
                    "subtotal": 100.0,
                    "delivery_fee": 49.0,
                    "tax": 5.0,
                    "total": 154.0,
                    "delivery_address": "42 Garden Road",
                    "created_at": created_at,
                }),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn history_is_scoped_and_newest_first() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        seed_order(&store, "u1", "1", "delivered", "2026-01-01T10:00:00+00:00").await;
        seed_order(&store, "u1", "2", "pending", "2026-01-02T10:00:00+00:00").await;
        seed_order(&store, "u2", "1", "pending", "2026-01-03T10:00:00+00:00").await;

        let mut view = OrdersView::new(store);
        view.fetch("u1").await.unwrap();

        assert_eq!(view.len(), 2);
        assert_eq!(view.entries()[0].order.status, OrderStatus::Pending);
        assert_eq!(view.entries()[0].restaurant_name.as_deref(), Some("Dragon Wok"));
        assert_eq!(view.entries()[1].restaurant_name.as_deref(), Some("Spice Garden"));
    }

    #[tokio::test]
    async fn missing_restaurant_degrades_to_nameless() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        seed_order(&store, "u1", "999", "pending", "2026-01-01T10:00:00+00:00").await;

        let mut view = OrdersView::new(store);
        view.fetch("u1").await.unwrap();

        assert_eq!(view.len(), 1);
        assert_eq!(view.entries()[0].restaurant_name, None);
    }

    #[tokio::test]
    async fn no_orders_is_an_empty_list() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let mut view = OrdersView::new(store);
        view.fetch("u1").await.unwrap();
        assert!(view.is_empty());
        assert!(!view.is_loading());
    }
}
