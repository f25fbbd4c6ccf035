//! Payment Model

use serde::{Deserialize, Serialize};

/// Payment method written by the checkout flow. The column itself is
/// free-form; this client only ever records cash on delivery.
pub const METHOD_CASH_ON_DELIVERY: &str = "cash_on_delivery";

/// Payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub order_id: String,
    /// Amount in currency units
    pub amount: f64,
    pub payment_method: String,
    pub payment_status: Option<PaymentStatus>,
    pub stripe_payment_id: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub order_id: String,
    pub amount: f64,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
}
