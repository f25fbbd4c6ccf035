//! Shopping cart
//!
//! One cart, one restaurant: the draft holds lines from a single
//! restaurant at a time, merges repeated adds by menu item, and persists
//! itself through an injected [`CartStorage`] on every mutation. Adding
//! from a different restaurant is not an error but a decision returned
//! to the caller as [`AddOutcome::DifferentRestaurant`].

pub mod storage;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared::models::{MenuItem, Restaurant};

use storage::CartStorage;

/// One cart line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Line id, fresh per add
    pub id: String,
    pub menu_item_id: String,
    pub name: String,
    /// Unit price at the time of adding
    pub price: f64,
    pub quantity: u32,
    pub image_url: Option<String>,
    pub restaurant_id: String,
    pub restaurant_name: String,
}

/// The persisted cart state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartDraft {
    pub items: Vec<CartItem>,
    /// Restaurant all items belong to, `None` when empty
    pub restaurant_id: Option<String>,
    pub restaurant_name: Option<String>,
}

impl CartDraft {
    /// Sum of price times quantity over all lines
    pub fn subtotal(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.price * item.quantity as f64)
            .sum()
    }
}

/// What the menu screen offers to the cart
#[derive(Debug, Clone)]
pub struct CartCandidate {
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    pub image_url: Option<String>,
    pub restaurant_id: String,
    pub restaurant_name: String,
}

impl CartCandidate {
    /// Build a candidate from a menu item and the restaurant it belongs to
    pub fn from_menu_item(item: &MenuItem, restaurant: &Restaurant) -> Self {
        Self {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            image_url: item.image_url.clone(),
            restaurant_id: restaurant.id.clone(),
            restaurant_name: restaurant.name.clone(),
        }
    }
}

/// Result of [`CartStore::add`]
///
/// `DifferentRestaurant` hands the conflict back to the caller: confirm
/// with [`CartStore::add_replacing`], or drop the candidate to decline.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line was appended
    Added,
    /// An existing line's quantity was bumped
    Merged,
    /// The cart holds items from another restaurant; nothing changed
    DifferentRestaurant { current: String },
}

/// The cart store
///
/// Owned by the UI task and mutated there only; every mutation writes
/// the full draft back through the storage.
#[derive(Debug)]
pub struct CartStore {
    draft: CartDraft,
    storage: Box<dyn CartStorage>,
}

impl CartStore {
    /// Create a store, loading whatever draft the storage holds
    pub fn new(storage: Box<dyn CartStorage>) -> Self {
        let draft = match storage.load() {
            Ok(Some(draft)) => draft,
            Ok(None) => CartDraft::default(),
            Err(e) => {
                tracing::warn!("Could not load saved cart, starting empty: {}", e);
                CartDraft::default()
            }
        };
        Self { draft, storage }
    }

    /// Store backed by in-process storage
    pub fn in_memory() -> Self {
        Self::new(Box::new(storage::MemoryStorage::default()))
    }

    /// Add one unit of a menu item.
    ///
    /// Merges into an existing line for the same menu item; refuses
    /// without mutating when the cart belongs to another restaurant.
    pub fn add(&mut self, candidate: CartCandidate) -> AddOutcome {
        if let Some(current) = self.draft.restaurant_id.as_deref() {
            if current != candidate.restaurant_id {
                return AddOutcome::DifferentRestaurant {
                    current: self.draft.restaurant_name.clone().unwrap_or_default(),
                };
            }
        }
        self.push(candidate)
    }

    /// Clear the cart and add the candidate, switching restaurants
    pub fn add_replacing(&mut self, candidate: CartCandidate) {
        self.draft = CartDraft::default();
        let _ = self.push(candidate);
    }

    fn push(&mut self, candidate: CartCandidate) -> AddOutcome {
        let outcome = match self
            .draft
            .items
            .iter_mut()
            .find(|line| line.menu_item_id == candidate.menu_item_id)
        {
            Some(line) => {
                line.quantity += 1;
                AddOutcome::Merged
            }
            None => {
                self.draft.restaurant_id = Some(candidate.restaurant_id.clone());
                self.draft.restaurant_name = Some(candidate.restaurant_name.clone());
                self.draft.items.push(CartItem {
                    id: Uuid::new_v4().to_string(),
                    menu_item_id: candidate.menu_item_id,
                    name: candidate.name,
                    price: candidate.price,
                    quantity: 1,
                    image_url: candidate.image_url,
                    restaurant_id: candidate.restaurant_id,
                    restaurant_name: candidate.restaurant_name,
                });
                AddOutcome::Added
            }
        };
        self.persist();
        outcome
    }

    /// Drop all lines for a menu item
    pub fn remove(&mut self, menu_item_id: &str) {
        self.draft
            .items
            .retain(|line| line.menu_item_id != menu_item_id);
        if self.draft.items.is_empty() {
            self.draft.restaurant_id = None;
            self.draft.restaurant_name = None;
        }
        self.persist();
    }

    /// Set the absolute quantity of a line; zero or less removes it
    pub fn update_quantity(&mut self, menu_item_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove(menu_item_id);
            return;
        }
        if let Some(line) = self
            .draft
            .items
            .iter_mut()
            .find(|line| line.menu_item_id == menu_item_id)
        {
            line.quantity = quantity as u32;
        }
        self.persist();
    }

    /// Empty the cart
    pub fn clear(&mut self) {
        self.draft = CartDraft::default();
        self.persist();
    }

    /// Sum of price times quantity
    pub fn total(&self) -> f64 {
        self.draft.subtotal()
    }

    /// Total units across all lines
    pub fn item_count(&self) -> u32 {
        self.draft.items.iter().map(|line| line.quantity).sum()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.draft.items
    }

    pub fn is_empty(&self) -> bool {
        self.draft.items.is_empty()
    }

    pub fn restaurant_id(&self) -> Option<&str> {
        self.draft.restaurant_id.as_deref()
    }

    pub fn restaurant_name(&self) -> Option<&str> {
        self.draft.restaurant_name.as_deref()
    }

    /// Owned copy of the draft, for handing to background work
    pub fn snapshot(&self) -> CartDraft {
        self.draft.clone()
    }

    // A failed write must not lose the in-memory cart
    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.draft) {
            tracing::warn!("Could not persist cart: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::{JsonFileStorage, MemoryStorage};

    fn candidate(menu_item_id: &str, name: &str, price: f64, restaurant: &str) -> CartCandidate {
        CartCandidate {
            menu_item_id: menu_item_id.to_string(),
            name: name.to_string(),
            price,
            image_url: None,
            restaurant_id: restaurant.to_string(),
            restaurant_name: format!("Restaurant {}", restaurant),
        }
    }

    fn cart() -> CartStore {
        CartStore::new(Box::new(MemoryStorage::default()))
    }

    #[test]
    fn repeated_add_merges_into_one_line() {
        let mut cart = cart();

        assert_eq!(cart.add(candidate("3", "Butter Chicken", 349.0, "1")), AddOutcome::Added);
        assert_eq!(cart.add(candidate("3", "Butter Chicken", 349.0, "1")), AddOutcome::Merged);
        assert_eq!(cart.add(candidate("3", "Butter Chicken", 349.0, "1")), AddOutcome::Merged);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn add_from_other_restaurant_is_refused_without_mutation() {
        let mut cart = cart();
        let _ = cart.add(candidate("3", "Butter Chicken", 349.0, "1"));

        let outcome = cart.add(candidate("9", "Kung Pao", 269.0, "2"));
        assert_eq!(
            outcome,
            AddOutcome::DifferentRestaurant {
                current: "Restaurant 1".to_string()
            }
        );

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.restaurant_id(), Some("1"));
        assert_eq!(cart.items()[0].menu_item_id, "3");
    }

    #[test]
    fn add_replacing_switches_restaurants() {
        let mut cart = cart();
        let _ = cart.add(candidate("3", "Butter Chicken", 349.0, "1"));
        let _ = cart.add(candidate("4", "Lamb Rogan Josh", 429.0, "1"));

        cart.add_replacing(candidate("9", "Kung Pao", 269.0, "2"));

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.restaurant_id(), Some("2"));
        assert_eq!(cart.restaurant_name(), Some("Restaurant 2"));
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn removing_the_last_line_clears_the_restaurant() {
        let mut cart = cart();
        let _ = cart.add(candidate("3", "Butter Chicken", 349.0, "1"));
        let _ = cart.add(candidate("7", "Garlic Naan", 59.0, "1"));

        cart.remove("3");
        assert_eq!(cart.restaurant_id(), Some("1"));

        cart.remove("7");
        assert!(cart.is_empty());
        assert_eq!(cart.restaurant_id(), None);
        assert_eq!(cart.restaurant_name(), None);
    }

    #[test]
    fn zero_or_negative_quantity_removes_the_line() {
        let mut cart = cart();
        let _ = cart.add(candidate("3", "Butter Chicken", 349.0, "1"));
        let _ = cart.add(candidate("7", "Garlic Naan", 59.0, "1"));

        cart.update_quantity("3", 0);
        assert!(cart.items().iter().all(|line| line.menu_item_id != "3"));

        cart.update_quantity("7", -2);
        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_sets_the_absolute_value() {
        let mut cart = cart();
        let _ = cart.add(candidate("7", "Garlic Naan", 59.0, "1"));

        cart.update_quantity("7", 4);
        assert_eq!(cart.items()[0].quantity, 4);
        assert_eq!(cart.item_count(), 4);

        // Unknown ids are a no-op
        cart.update_quantity("nope", 2);
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn totals_follow_price_times_quantity() {
        let mut cart = cart();
        let _ = cart.add(candidate("3", "Butter Chicken", 349.0, "1"));
        let _ = cart.add(candidate("3", "Butter Chicken", 349.0, "1"));
        let _ = cart.add(candidate("7", "Garlic Naan", 59.0, "1"));

        assert!((cart.total() - (2.0 * 349.0 + 59.0)).abs() < 1e-9);
        assert_eq!(cart.item_count(), 3);

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0.0);
        assert_eq!(cart.restaurant_id(), None);
    }

    #[test]
    fn draft_never_mixes_restaurants() {
        let mut cart = cart();
        let _ = cart.add(candidate("1", "Samosas", 89.0, "1"));
        let _ = cart.add(candidate("9", "Kung Pao", 269.0, "2"));
        cart.add_replacing(candidate("10", "Spring Rolls", 129.0, "2"));
        let _ = cart.add(candidate("9", "Kung Pao", 269.0, "2"));

        let ids: std::collections::HashSet<_> = cart
            .items()
            .iter()
            .map(|line| line.restaurant_id.as_str())
            .collect();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn cart_survives_a_restart_through_the_file() {
        let dir = tempfile::tempdir().unwrap();

        {
            let mut cart = CartStore::new(Box::new(JsonFileStorage::new(dir.path())));
            let _ = cart.add(candidate("3", "Butter Chicken", 349.0, "1"));
            cart.update_quantity("3", 2);
        }

        let reloaded = CartStore::new(Box::new(JsonFileStorage::new(dir.path())));
        assert_eq!(reloaded.items().len(), 1);
        assert_eq!(reloaded.items()[0].quantity, 2);
        assert_eq!(reloaded.restaurant_id(), Some("1"));
        assert!((reloaded.total() - 698.0).abs() < 1e-9);
    }

    #[test]
    fn corrupt_saved_state_starts_an_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path());
        std::fs::write(storage.path(), "{ not json").unwrap();

        let cart = CartStore::new(Box::new(storage));
        assert!(cart.is_empty());
    }
}
