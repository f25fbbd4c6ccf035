//! Demo dataset
//!
//! The catalog the offline demo boots with: eight restaurants, with a
//! full menu for the first one, plus a profile for the demo account.

use shared::models::{MenuCategory, MenuItem, Profile, Restaurant};

use super::MemoryStore;

/// User id the offline demo signs in as
pub const DEMO_USER_ID: &str = "demo-user";

/// Load the demo catalog into a store
pub fn seed(store: &MemoryStore) {
    let now = chrono::Utc::now().to_rfc3339();

    store.seed_table("restaurants", rows(restaurants(&now)));
    store.seed_table("menu_categories", rows(categories(&now)));
    store.seed_table("menu_items", rows(menu_items(&now)));
    store.seed_table("profiles", rows(vec![demo_profile(&now)]));
}

fn rows<T: serde::Serialize>(items: Vec<T>) -> Vec<serde_json::Value> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).expect("Failed to serialize fixture"))
        .collect()
}

fn some(text: &str) -> Option<String> {
    Some(text.to_string())
}

fn unsplash(photo: &str, width: u32) -> Option<String> {
    Some(format!(
        "https://images.unsplash.com/{}?w={}&auto=format&fit=crop",
        photo, width
    ))
}

fn restaurant(
    id: u32,
    name: &str,
    description: &str,
    cuisine: &str,
    photo: &str,
    address: &str,
    open: &str,
    close: &str,
    min_order: f64,
    delivery_fee: f64,
    avg_minutes: i32,
    rating: f64,
    reviews: i64,
    verified: bool,
    now: &str,
) -> Restaurant {
    Restaurant {
        id: id.to_string(),
        owner_id: id.to_string(),
        name: name.to_string(),
        description: some(description),
        cuisine_type: cuisine.to_string(),
        image_url: unsplash(photo, 800),
        address: address.to_string(),
        latitude: None,
        longitude: None,
        phone: Some(format!("+123456789{}", id - 1)),
        opening_time: some(open),
        closing_time: some(close),
        min_order_amount: min_order,
        delivery_fee,
        avg_delivery_time: avg_minutes,
        rating,
        total_reviews: reviews,
        is_active: true,
        is_verified: verified,
        created_at: some(now),
        updated_at: some(now),
    }
}

fn restaurants(now: &str) -> Vec<Restaurant> {
    vec![
        restaurant(
            1,
            "Spice Garden",
            "Authentic Indian cuisine with a modern twist",
            "Indian",
            "photo-1585937421612-70a008356fbe",
            "123 Curry Lane, Food District",
            "09:00",
            "22:00",
            15.0,
            2.99,
            35,
            4.7,
            324,
            true,
            now,
        ),
        restaurant(
            2,
            "Dragon Wok",
            "Traditional Chinese flavors",
            "Chinese",
            "photo-1563245372-f21724e3856d",
            "456 Noodle Street",
            "10:00",
            "23:00",
            12.0,
            0.0,
            25,
            4.5,
            256,
            true,
            now,
        ),
        restaurant(
            3,
            "Bella Italia",
            "Authentic Italian pasta and pizza",
            "Italian",
            "photo-1565299624946-b28f40a0ae38",
            "789 Pizza Avenue",
            "11:00",
            "22:00",
            20.0,
            3.49,
            40,
            4.8,
            512,
            false,
            now,
        ),
        restaurant(
            4,
            "Taco Fiesta",
            "Fresh Mexican street food",
            "Mexican",
            "photo-1565299585323-38d6b0865b47",
            "321 Salsa Boulevard",
            "09:00",
            "21:00",
            10.0,
            1.99,
            20,
            4.6,
            189,
            true,
            now,
        ),
        restaurant(
            5,
            "Sushi Master",
            "Fresh sushi and Japanese delicacies",
            "Japanese",
            "photo-1579871494447-9811cf80d66c",
            "567 Sakura Street",
            "11:00",
            "22:00",
            25.0,
            4.99,
            45,
            4.9,
            678,
            true,
            now,
        ),
        restaurant(
            6,
            "Thai Orchid",
            "Authentic Thai street food",
            "Thai",
            "photo-1562565652-a0d8f0c59eb4",
            "890 Bangkok Lane",
            "10:00",
            "22:00",
            15.0,
            2.49,
            30,
            4.4,
            145,
            false,
            now,
        ),
        restaurant(
            7,
            "Burger Joint",
            "Gourmet burgers and fries",
            "American",
            "photo-1568901346375-23c9450c58cd",
            "234 Main Street",
            "11:00",
            "23:00",
            12.0,
            1.99,
            25,
            4.3,
            234,
            true,
            now,
        ),
        restaurant(
            8,
            "Mediterranean Grill",
            "Fresh Mediterranean cuisine",
            "Mediterranean",
            "photo-1544025162-d76694265947",
            "456 Olive Street",
            "10:00",
            "21:00",
            18.0,
            2.99,
            35,
            4.6,
            167,
            true,
            now,
        ),
    ]
}

fn category(id: u32, name: &str, description: &str, sort_order: i32, now: &str) -> MenuCategory {
    MenuCategory {
        id: id.to_string(),
        restaurant_id: "1".to_string(),
        name: name.to_string(),
        description: some(description),
        sort_order,
        created_at: some(now),
    }
}

fn categories(now: &str) -> Vec<MenuCategory> {
    vec![
        category(1, "Appetizers", "Start your meal right", 1, now),
        category(2, "Main Course", "Hearty main dishes", 2, now),
        category(3, "Breads", "Fresh baked breads", 3, now),
        category(4, "Desserts", "Sweet endings", 4, now),
    ]
}

fn item(
    id: u32,
    category: u32,
    name: &str,
    description: &str,
    price: f64,
    photo: &str,
    vegetarian: bool,
    spicy: bool,
    prep_minutes: i32,
    now: &str,
) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        restaurant_id: "1".to_string(),
        category_id: Some(category.to_string()),
        name: name.to_string(),
        description: some(description),
        price,
        image_url: unsplash(photo, 400),
        is_vegetarian: vegetarian,
        is_vegan: false,
        is_spicy: spicy,
        is_available: true,
        prep_time: prep_minutes,
        created_at: some(now),
        updated_at: some(now),
    }
}

fn menu_items(now: &str) -> Vec<MenuItem> {
    vec![
        item(
            1,
            1,
            "Samosas (2 pcs)",
            "Crispy pastry filled with spiced potatoes and peas",
            89.0,
            "photo-1601050690597-df0568f70950",
            true,
            false,
            10,
            now,
        ),
        item(
            2,
            1,
            "Chicken Tikka",
            "Marinated chicken pieces grilled to perfection",
            199.0,
            "photo-1599487488170-d11ec9c172f0",
            false,
            true,
            15,
            now,
        ),
        item(
            3,
            2,
            "Butter Chicken",
            "Tender chicken in creamy tomato sauce with aromatic spices",
            349.0,
            "photo-1603894584373-5ac82b2ae398",
            false,
            false,
            20,
            now,
        ),
        item(
            4,
            2,
            "Lamb Rogan Josh",
            "Slow-cooked lamb in rich Kashmiri spices",
            429.0,
            "photo-1545247181-516773cae754",
            false,
            true,
            25,
            now,
        ),
        item(
            5,
            2,
            "Palak Paneer",
            "Fresh cottage cheese cubes in creamy spinach sauce",
            279.0,
            "photo-1601050690597-df0568f70950",
            true,
            false,
            15,
            now,
        ),
        item(
            6,
            2,
            "Chicken Vindaloo",
            "Fiery hot chicken curry with potatoes",
            319.0,
            "photo-1565557623262-b51c2513a641",
            false,
            true,
            20,
            now,
        ),
        item(
            7,
            3,
            "Garlic Naan",
            "Soft leavened bread topped with garlic and butter",
            59.0,
            "photo-1601050690597-df0568f70950",
            true,
            false,
            8,
            now,
        ),
        item(
            8,
            4,
            "Gulab Jamun",
            "Sweet milk dumplings in rose-flavored syrup",
            99.0,
            "photo-1666190094617-d2e8dbdf1a09",
            true,
            false,
            5,
            now,
        ),
    ]
}

fn demo_profile(now: &str) -> Profile {
    Profile {
        id: DEMO_USER_ID.to_string(),
        email: "demo@foodiehub.app".to_string(),
        full_name: some("Demo User"),
        phone: some("9876543210"),
        avatar_url: None,
        address: some("42 Garden Road, Food District"),
        latitude: None,
        longitude: None,
        created_at: some(now),
        updated_at: some(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Query;
    use crate::store::{DataStore, DataStoreExt};
    use shared::models::MenuItem;

    #[tokio::test]
    async fn spice_garden_menu_is_complete() {
        let store = MemoryStore::with_sample_data();

        let items: Vec<MenuItem> = store
            .list_rows(&Query::table("menu_items").eq("restaurant_id", "1"))
            .await
            .unwrap();
        assert_eq!(items.len(), 8);
        assert!(items.iter().all(|item| item.is_available));
    }

    #[tokio::test]
    async fn demo_profile_is_seeded() {
        let store = MemoryStore::with_sample_data();
        let profile = store.fetch_by_id("profiles", DEMO_USER_ID).await.unwrap();
        assert!(profile.is_some());
    }
}
