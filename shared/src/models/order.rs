//! Order Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status lifecycle
///
/// `Cancelled` is reachable from any non-terminal status and sits outside
/// the fixed progression; `Unknown` absorbs any status string the backend
/// might add later.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    ReadyForPickup,
    OutForDelivery,
    Delivered,
    Cancelled,
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    /// The fixed ordered progression shown by the tracking UI.
    pub const PROGRESSION: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::ReadyForPickup,
        OrderStatus::OutForDelivery,
        OrderStatus::Delivered,
    ];

    /// Zero-based position within [`Self::PROGRESSION`].
    ///
    /// `None` for `Cancelled` and `Unknown`.
    pub fn position(&self) -> Option<usize> {
        Self::PROGRESSION.iter().position(|s| s == self)
    }

    /// Backend wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::ReadyForPickup => "ready_for_pickup",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }

    /// Short label for the tracking step list.
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Order Placed",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::ReadyForPickup => "Ready",
            OrderStatus::OutForDelivery => "On the Way",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Unknown => "Unknown",
        }
    }

    /// One-line description for the tracking step list.
    pub fn description(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Your order has been received",
            OrderStatus::Confirmed => "Restaurant confirmed your order",
            OrderStatus::Preparing => "Your food is being prepared",
            OrderStatus::ReadyForPickup => "Order is ready for pickup",
            OrderStatus::OutForDelivery => "Your order is on its way",
            OrderStatus::Delivered => "Order has been delivered",
            OrderStatus::Cancelled => "This order was cancelled",
            OrderStatus::Unknown => "",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Humanize a raw status string: "out_for_delivery" -> "Out For Delivery".
pub fn humanize_status(status: &str) -> String {
    status
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub customer_id: Option<String>,
    pub restaurant_id: String,
    pub delivery_partner_id: Option<String>,
    pub status: OrderStatus,
    /// Amounts in currency units
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
    pub delivery_address: String,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
    pub special_instructions: Option<String>,
    pub estimated_delivery_time: Option<String>,
    pub actual_delivery_time: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: String,
    pub restaurant_id: String,
    pub status: OrderStatus,
    pub subtotal: f64,
    pub delivery_fee: f64,
    pub tax: f64,
    pub total: f64,
    pub delivery_address: String,
    pub delivery_latitude: Option<f64>,
    pub delivery_longitude: Option<f64>,
    pub special_instructions: Option<String>,
    pub estimated_delivery_time: Option<String>,
}

/// Order item entity (immutable snapshot of a cart line)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: Option<String>,
    pub name: String,
    pub quantity: i64,
    /// Unit price in currency units at order time
    pub unit_price: f64,
    pub total_price: f64,
    pub special_instructions: Option<String>,
    pub created_at: Option<String>,
}

/// Create order item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub order_id: String,
    pub menu_item_id: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progression_positions() {
        assert_eq!(OrderStatus::Pending.position(), Some(0));
        assert_eq!(OrderStatus::OutForDelivery.position(), Some(4));
        assert_eq!(OrderStatus::Delivered.position(), Some(5));
        assert_eq!(OrderStatus::Cancelled.position(), None);
        assert_eq!(OrderStatus::Unknown.position(), None);
    }

    #[test]
    fn status_wire_format() {
        let json = serde_json::to_string(&OrderStatus::ReadyForPickup).unwrap();
        assert_eq!(json, "\"ready_for_pickup\"");

        let parsed: OrderStatus = serde_json::from_str("\"out_for_delivery\"").unwrap();
        assert_eq!(parsed, OrderStatus::OutForDelivery);
    }

    #[test]
    fn unknown_status_is_absorbed() {
        let parsed: OrderStatus = serde_json::from_str("\"on_hold\"").unwrap();
        assert_eq!(parsed, OrderStatus::Unknown);
        assert_eq!(parsed.position(), None);
    }

    #[test]
    fn humanize_snake_case() {
        assert_eq!(humanize_status("out_for_delivery"), "Out For Delivery");
        assert_eq!(humanize_status("pending"), "Pending");
        assert_eq!(humanize_status("cancelled"), "Cancelled");
    }
}
