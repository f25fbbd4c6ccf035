//! Restaurant Model

use serde::{Deserialize, Serialize};

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    /// One of the fixed cuisine catalog values ("Indian", "Chinese", ...)
    pub cuisine_type: String,
    pub image_url: Option<String>,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub phone: Option<String>,
    /// Local time "HH:MM"
    pub opening_time: Option<String>,
    pub closing_time: Option<String>,
    /// Minimum order amount in currency units
    pub min_order_amount: f64,
    /// Delivery fee in currency units
    pub delivery_fee: f64,
    /// Average delivery time in minutes
    pub avg_delivery_time: i32,
    pub rating: f64,
    pub total_reviews: i64,
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}
