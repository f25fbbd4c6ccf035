//! Restaurant detail and menu
//!
//! Fetches one restaurant, its categories in display order and the
//! items currently available, then serves the menu grouped by category.

use std::sync::Arc;

use hub_client::{ClientResult, DataStore, DataStoreExt, Query};
use shared::models::{MenuCategory, MenuItem, Restaurant};

use super::ViewState;

/// Everything the detail screen needs, fetched in one pass
#[derive(Debug)]
pub struct MenuPayload {
    pub restaurant: Option<Restaurant>,
    pub categories: Vec<MenuCategory>,
    pub items: Vec<MenuItem>,
}

/// Restaurant detail view model
#[derive(Debug)]
pub struct MenuView {
    store: Arc<dyn DataStore>,
    restaurant_id: Option<String>,
    state: ViewState,
    restaurant: Option<Restaurant>,
    categories: Vec<MenuCategory>,
    items: Vec<MenuItem>,
    active_category: Option<String>,
}

impl MenuView {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            restaurant_id: None,
            state: ViewState::Loading,
            restaurant: None,
            categories: Vec::new(),
            items: Vec::new(),
            active_category: None,
        }
    }

    /// Point the view at a restaurant and reset to loading
    pub fn begin(&mut self, restaurant_id: &str) {
        self.restaurant_id = Some(restaurant_id.to_string());
        self.state = ViewState::Loading;
        self.restaurant = None;
        self.categories.clear();
        self.items.clear();
        self.active_category = None;
    }

    /// Fetch the restaurant, its ordered categories and available items
    pub async fn load(
        store: &Arc<dyn DataStore>,
        restaurant_id: &str,
    ) -> ClientResult<MenuPayload> {
        let restaurant = store.get_row("restaurants", restaurant_id).await?;
        let categories = store
            .list_rows(
                &Query::table("menu_categories")
                    .eq("restaurant_id", restaurant_id)
                    .order_asc("sort_order"),
            )
            .await?;
        let items = store
            .list_rows(
                &Query::table("menu_items")
                    .eq("restaurant_id", restaurant_id)
                    .eq("is_available", true),
            )
            .await?;
        Ok(MenuPayload {
            restaurant,
            categories,
            items,
        })
    }

    /// Install a fetched payload; late payloads for another restaurant
    /// are dropped.
    pub fn apply(&mut self, restaurant_id: &str, payload: MenuPayload) {
        if self.restaurant_id.as_deref() != Some(restaurant_id) {
            tracing::debug!("Dropping stale menu payload for {}", restaurant_id);
            return;
        }
        self.state = if payload.restaurant.is_some() {
            ViewState::Ready
        } else {
            ViewState::NotFound
        };
        self.restaurant = payload.restaurant;
        self.categories = payload.categories;
        self.items = payload.items;
        self.active_category = self.categories.first().map(|c| c.id.clone());
    }

    /// Begin, load and apply in one await
    pub async fn open(&mut self, restaurant_id: &str) -> ClientResult<()> {
        self.begin(restaurant_id);
        let payload = Self::load(&self.store, restaurant_id).await?;
        self.apply(restaurant_id, payload);
        Ok(())
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn restaurant(&self) -> Option<&Restaurant> {
        self.restaurant.as_ref()
    }

    pub fn restaurant_id(&self) -> Option<&str> {
        self.restaurant_id.as_deref()
    }

    pub fn categories(&self) -> &[MenuCategory] {
        &self.categories
    }

    pub fn active_category(&self) -> Option<&str> {
        self.active_category.as_deref()
    }

    /// Index of the active category, for the tab strip
    pub fn active_category_index(&self) -> usize {
        self.active_category
            .as_deref()
            .and_then(|id| self.categories.iter().position(|c| c.id == id))
            .unwrap_or(0)
    }

    /// Items belonging to one category
    pub fn items_in(&self, category_id: &str) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| item.category_id.as_deref() == Some(category_id))
            .collect()
    }

    /// Items of the active category
    pub fn active_items(&self) -> Vec<&MenuItem> {
        match self.active_category.as_deref() {
            Some(id) => self.items_in(id),
            None => Vec::new(),
        }
    }

    pub fn next_category(&mut self) {
        self.step_category(1);
    }

    pub fn prev_category(&mut self) {
        self.step_category(-1);
    }

    fn step_category(&mut self, step: isize) {
        if self.categories.is_empty() {
            return;
        }
        let len = self.categories.len() as isize;
        let at = self.active_category_index() as isize;
        let next = (at + step).rem_euclid(len) as usize;
        self.active_category = Some(self.categories[next].id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_client::MemoryStore;

    async fn spice_garden() -> MenuView {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let mut view = MenuView::new(store);
        view.open("1").await.unwrap();
        view
    }

    #[tokio::test]
    async fn open_loads_the_full_menu() {
        let view = spice_garden().await;

        assert_eq!(view.state(), ViewState::Ready);
        assert_eq!(view.restaurant().unwrap().name, "Spice Garden");
        assert_eq!(view.categories().len(), 4);
        assert_eq!(view.items_in("2").len(), 4);
    }

    #[tokio::test]
    async fn categories_arrive_in_sort_order() {
        let view = spice_garden().await;
        let orders: Vec<i32> = view.categories().iter().map(|c| c.sort_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn first_category_starts_active() {
        let mut view = spice_garden().await;

        assert_eq!(view.active_category(), Some("1"));
        let starters: Vec<_> = view.active_items().iter().map(|i| i.name.clone()).collect();
        assert_eq!(starters, vec!["Samosas (2 pcs)", "Chicken Tikka"]);

        view.next_category();
        assert_eq!(view.active_category(), Some("2"));
        view.prev_category();
        view.prev_category();
        assert_eq!(view.active_category(), Some("4"));
    }

    #[tokio::test]
    async fn unknown_restaurant_is_not_found() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let mut view = MenuView::new(store);
        view.open("999").await.unwrap();

        assert_eq!(view.state(), ViewState::NotFound);
        assert!(view.restaurant().is_none());
    }

    #[tokio::test]
    async fn unavailable_items_are_excluded() {
        let store = MemoryStore::with_sample_data();
        store.seed_table(
            "menu_items",
            vec![serde_json::json!({
                "id": "86",
                "restaurant_id": "1",
                "category_id": "2",
                "name": "Out of Stock Special",
                "price": 199.0,
                "is_vegetarian": false,
                "is_vegan": false,
                "is_spicy": false,
                "is_available": false,
                "prep_time": 10
            })],
        );

        let store: Arc<dyn DataStore> = Arc::new(store);
        let mut view = MenuView::new(store);
        view.open("1").await.unwrap();

        assert!(view
            .items_in("2")
            .iter()
            .all(|item| item.name != "Out of Stock Special"));
    }

    #[tokio::test]
    async fn stale_payload_is_dropped() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let mut view = MenuView::new(store.clone());

        view.begin("1");
        let stale = MenuView::load(&store, "1").await.unwrap();

        // User navigated on before the payload arrived
        view.begin("2");
        view.apply("1", stale);

        assert_eq!(view.state(), ViewState::Loading);
        assert!(view.restaurant().is_none());
    }
}
