//! FoodieHub - terminal food ordering client
//!
//! Browse restaurants, build a cart, check out and follow the order as
//! the kitchen works through it. All persistence, auth and realtime
//! delivery live behind [`hub_client`]; this crate owns the cart, the
//! view models and the terminal shell.

pub mod autocomplete;
pub mod cart;
pub mod config;
pub mod ui;
pub mod views;

pub use config::{AppConfig, OrderPricing};
