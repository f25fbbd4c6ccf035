//! Checkout
//!
//! Validates the delivery details, then writes the order, its item
//! snapshot and a cash-on-delivery payment record.

use std::sync::Arc;

use hub_client::{ClientError, DataStore, DataStoreExt};
use shared::models::{
    METHOD_CASH_ON_DELIVERY, Order, OrderCreate, OrderItemCreate, OrderStatus, Payment,
    PaymentCreate, PaymentStatus, Profile,
};

use crate::OrderPricing;
use crate::cart::CartDraft;

/// Why an order could not be placed
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("Sign in to place an order")]
    NotSignedIn,
    #[error("Delivery address is required")]
    EmptyAddress,
    #[error("Phone number is required")]
    EmptyPhone,
    #[error("Your cart is empty")]
    EmptyCart,
    #[error(transparent)]
    Backend(#[from] ClientError),
}

/// Delivery details entered on the checkout screen
#[derive(Debug, Clone, Default)]
pub struct CheckoutForm {
    pub address: String,
    pub phone: String,
    pub instructions: String,
    /// Coordinates from a picked suggestion or the saved profile
    pub coords: Option<(f64, f64)>,
}

/// Checkout screen state
#[derive(Debug, Default)]
pub struct CheckoutFlow {
    pub form: CheckoutForm,
    pub submitting: bool,
    prefilled: bool,
}

impl CheckoutFlow {
    /// Copy saved profile details into fields the user has not filled.
    ///
    /// Runs once per flow, so edits survive profile reloads.
    pub fn prefill(&mut self, profile: &Profile) {
        if self.prefilled {
            return;
        }
        self.prefilled = true;
        if self.form.address.is_empty() {
            if let Some(address) = &profile.address {
                self.form.address = address.clone();
            }
        }
        if self.form.phone.is_empty() {
            if let Some(phone) = &profile.phone {
                self.form.phone = phone.clone();
            }
        }
        if self.form.coords.is_none() {
            if let (Some(lat), Some(lon)) = (profile.latitude, profile.longitude) {
                self.form.coords = Some((lat, lon));
            }
        }
    }

    /// Reset for the next order
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Validate and submit the order.
///
/// All checks run before anything is written, so a rejected checkout
/// leaves no partial rows behind. Returns the new order id.
pub async fn place_order(
    store: &Arc<dyn DataStore>,
    pricing: &OrderPricing,
    customer_id: Option<&str>,
    draft: &CartDraft,
    form: &CheckoutForm,
) -> Result<String, CheckoutError> {
    let customer_id = customer_id.ok_or(CheckoutError::NotSignedIn)?;
    let address = form.address.trim();
    if address.is_empty() {
        return Err(CheckoutError::EmptyAddress);
    }
    let phone = form.phone.trim();
    if phone.is_empty() {
        return Err(CheckoutError::EmptyPhone);
    }
    if draft.items.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let restaurant_id = draft
        .restaurant_id
        .clone()
        .ok_or(CheckoutError::EmptyCart)?;

    let subtotal = draft.subtotal();
    let instructions = form.instructions.trim();
    let create = OrderCreate {
        customer_id: customer_id.to_string(),
        restaurant_id,
        status: OrderStatus::Pending,
        subtotal,
        delivery_fee: pricing.delivery_fee,
        tax: pricing.tax(subtotal),
        total: pricing.total(subtotal),
        delivery_address: address.to_string(),
        delivery_latitude: form.coords.map(|(lat, _)| lat),
        delivery_longitude: form.coords.map(|(_, lon)| lon),
        special_instructions: (!instructions.is_empty()).then(|| instructions.to_string()),
        estimated_delivery_time: Some(pricing.estimated_delivery(chrono::Utc::now()).to_rfc3339()),
    };
    let order: Order = store.insert_row("orders", &create).await?;

    let items: Vec<OrderItemCreate> = draft
        .items
        .iter()
        .map(|item| OrderItemCreate {
            order_id: order.id.clone(),
            menu_item_id: Some(item.menu_item_id.clone()),
            name: item.name.clone(),
            quantity: item.quantity as i64,
            unit_price: item.price,
            total_price: item.price * item.quantity as f64,
        })
        .collect();
    store.insert_rows("order_items", &items).await?;

    let payment = PaymentCreate {
        order_id: order.id.clone(),
        amount: order.total,
        payment_method: METHOD_CASH_ON_DELIVERY.to_string(),
        payment_status: PaymentStatus::Pending,
    };
    let _: Payment = store.insert_row("payments", &payment).await?;

    tracing::info!(order_id = %order.id, total = order.total, "Order placed");
    Ok(order.id)
}
