//! Review Model

use serde::{Deserialize, Serialize};

/// Review entity (read-only in this client; aggregation happens backend-side)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub customer_id: String,
    pub restaurant_id: String,
    pub order_id: Option<String>,
    /// 1..=5
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Delivery partner stats row (read-only contract type)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPartnerStats {
    pub id: String,
    pub partner_id: String,
    pub total_deliveries: i64,
    pub rating: Option<f64>,
    pub is_available: bool,
    pub created_at: Option<String>,
}
