//! Restaurant listing
//!
//! Holds every active restaurant and projects the visible slice from
//! the search text, the cuisine filter and the sort key. Projection is
//! pure so the controls recompute instantly without refetching.

use std::cmp::Ordering;
use std::sync::Arc;

use hub_client::{DataStore, DataStoreExt, Query};
use shared::cuisine::{CUISINE_ALL, CUISINE_FILTERS};
use shared::models::Restaurant;

/// Listing sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    RatingDesc,
    DeliveryTimeAsc,
    DeliveryFeeAsc,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::RatingDesc => "Rating",
            SortKey::DeliveryTimeAsc => "Delivery Time",
            SortKey::DeliveryFeeAsc => "Delivery Fee",
        }
    }

    /// The next key in the cycle the sort control steps through
    pub fn next(&self) -> Self {
        match self {
            SortKey::RatingDesc => SortKey::DeliveryTimeAsc,
            SortKey::DeliveryTimeAsc => SortKey::DeliveryFeeAsc,
            SortKey::DeliveryFeeAsc => SortKey::RatingDesc,
        }
    }
}

/// Restaurant listing view model
#[derive(Debug)]
pub struct RestaurantsView {
    store: Arc<dyn DataStore>,
    restaurants: Vec<Restaurant>,
    loading: bool,
    pub search: String,
    /// Exact `cuisine_type` value, or the `all` sentinel
    pub cuisine: String,
    pub sort: SortKey,
}

impl RestaurantsView {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            store,
            restaurants: Vec::new(),
            loading: false,
            search: String::new(),
            cuisine: CUISINE_ALL.to_string(),
            sort: SortKey::default(),
        }
    }

    /// Fetch all active restaurants.
    ///
    /// A failed fetch logs and leaves an empty base collection.
    pub async fn load(store: &Arc<dyn DataStore>) -> Vec<Restaurant> {
        let query = Query::table("restaurants").eq("is_active", true);
        match store.list_rows(&query).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::error!("Could not load restaurants: {}", e);
                Vec::new()
            }
        }
    }

    pub fn set_loading(&mut self) {
        self.loading = true;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn apply(&mut self, restaurants: Vec<Restaurant>) {
        self.restaurants = restaurants;
        self.loading = false;
    }

    /// Load and apply in one await
    pub async fn fetch(&mut self) {
        self.loading = true;
        let rows = Self::load(&self.store).await;
        self.apply(rows);
    }

    /// Number of restaurants before filtering
    pub fn len(&self) -> usize {
        self.restaurants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restaurants.is_empty()
    }

    /// Advance the cuisine filter to the next catalog entry
    pub fn next_cuisine(&mut self) {
        let at = CUISINE_FILTERS
            .iter()
            .position(|c| c.value == self.cuisine)
            .unwrap_or(0);
        self.cuisine = CUISINE_FILTERS[(at + 1) % CUISINE_FILTERS.len()]
            .value
            .to_string();
    }

    /// Advance the sort key
    pub fn next_sort(&mut self) {
        self.sort = self.sort.next();
    }

    /// Highest rated restaurants, ignoring the active filters.
    ///
    /// Feeds the home screen's featured list.
    pub fn top_rated(&self, n: usize) -> Vec<&Restaurant> {
        let mut rows: Vec<&Restaurant> = self.restaurants.iter().collect();
        rows.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
        rows.truncate(n);
        rows
    }

    /// The filtered, sorted slice the screen shows.
    ///
    /// Search matches name or cuisine case-insensitively; the cuisine
    /// filter is an exact match unless set to the `all` sentinel.
    pub fn visible(&self) -> Vec<&Restaurant> {
        let needle = self.search.trim().to_lowercase();
        let mut rows: Vec<&Restaurant> = self
            .restaurants
            .iter()
            .filter(|r| {
                let in_search = needle.is_empty()
                    || r.name.to_lowercase().contains(&needle)
                    || r.cuisine_type.to_lowercase().contains(&needle);
                let in_cuisine = self.cuisine == CUISINE_ALL || r.cuisine_type == self.cuisine;
                in_search && in_cuisine
            })
            .collect();

        match self.sort {
            SortKey::RatingDesc => rows.sort_by(|a, b| {
                b.rating
                    .partial_cmp(&a.rating)
                    .unwrap_or(Ordering::Equal)
            }),
            SortKey::DeliveryTimeAsc => rows.sort_by_key(|r| r.avg_delivery_time),
            SortKey::DeliveryFeeAsc => rows.sort_by(|a, b| {
                a.delivery_fee
                    .partial_cmp(&b.delivery_fee)
                    .unwrap_or(Ordering::Equal)
            }),
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hub_client::MemoryStore;

    async fn loaded_view() -> RestaurantsView {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_sample_data());
        let mut view = RestaurantsView::new(store);
        view.fetch().await;
        view
    }

    #[tokio::test]
    async fn fetch_loads_all_active_restaurants() {
        let view = loaded_view().await;
        assert_eq!(view.len(), 8);
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn default_sort_is_rating_descending() {
        let view = loaded_view().await;
        let visible = view.visible();

        assert_eq!(visible[0].name, "Sushi Master");
        assert!(visible.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[tokio::test]
    async fn search_matches_name_or_cuisine() {
        let mut view = loaded_view().await;

        view.search = "spice".to_string();
        let by_name: Vec<_> = view.visible().iter().map(|r| r.name.clone()).collect();
        assert_eq!(by_name, vec!["Spice Garden"]);

        view.search = "chinese".to_string();
        let by_cuisine: Vec<_> = view.visible().iter().map(|r| r.name.clone()).collect();
        assert_eq!(by_cuisine, vec!["Dragon Wok"]);

        view.search = "  ".to_string();
        assert_eq!(view.visible().len(), 8);
    }

    #[tokio::test]
    async fn cuisine_filter_is_exact_with_all_sentinel() {
        let mut view = loaded_view().await;

        view.cuisine = "Italian".to_string();
        let visible = view.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Bella Italia");

        view.cuisine = CUISINE_ALL.to_string();
        assert_eq!(view.visible().len(), 8);
    }

    #[tokio::test]
    async fn fee_sort_puts_free_delivery_first() {
        let mut view = loaded_view().await;
        view.sort = SortKey::DeliveryFeeAsc;

        let visible = view.visible();
        assert_eq!(visible[0].name, "Dragon Wok");
        assert!(visible
            .windows(2)
            .all(|w| w[0].delivery_fee <= w[1].delivery_fee));
    }

    #[tokio::test]
    async fn time_sort_is_ascending() {
        let mut view = loaded_view().await;
        view.sort = SortKey::DeliveryTimeAsc;

        let visible = view.visible();
        assert!(visible
            .windows(2)
            .all(|w| w[0].avg_delivery_time <= w[1].avg_delivery_time));
    }

    #[tokio::test]
    async fn top_rated_ignores_the_active_filters() {
        let mut view = loaded_view().await;
        view.search = "nothing matches this".to_string();
        view.cuisine = "Italian".to_string();

        let top = view.top_rated(3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].name, "Sushi Master");
        assert!(top.windows(2).all(|w| w[0].rating >= w[1].rating));
    }

    #[tokio::test]
    async fn search_and_cuisine_compose() {
        let mut view = loaded_view().await;
        view.search = "grill".to_string();
        view.cuisine = "Indian".to_string();
        assert!(view.visible().is_empty());

        view.cuisine = "Mediterranean".to_string();
        assert_eq!(view.visible().len(), 1);
    }

    #[test]
    fn cuisine_cycle_wraps_through_the_catalog() {
        let store: Arc<dyn DataStore> = Arc::new(MemoryStore::new());
        let mut view = RestaurantsView::new(store);

        for _ in 0..CUISINE_FILTERS.len() {
            view.next_cuisine();
        }
        assert_eq!(view.cuisine, CUISINE_ALL);
    }

    #[test]
    fn sort_cycle_returns_to_rating() {
        assert_eq!(
            SortKey::RatingDesc.next().next().next(),
            SortKey::RatingDesc
        );
    }
}
