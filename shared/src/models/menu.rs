//! Menu Models

use serde::{Deserialize, Serialize};

/// Menu category entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuCategory {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Display position within the restaurant's menu
    pub sort_order: i32,
    pub created_at: Option<String>,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub category_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    /// Price in currency units
    pub price: f64,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_vegetarian: bool,
    #[serde(default)]
    pub is_vegan: bool,
    #[serde(default)]
    pub is_spicy: bool,
    pub is_available: bool,
    /// Preparation time in minutes
    #[serde(default)]
    pub prep_time: i32,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
