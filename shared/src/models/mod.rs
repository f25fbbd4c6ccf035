//! Backend data contract
//!
//! Row types for the tables this client consumes, field-for-field with the
//! backend schema. Timestamps stay as the ISO-8601 strings the backend
//! serves; prices are plain floats in currency units.

pub mod menu;
pub mod order;
pub mod payment;
pub mod profile;
pub mod restaurant;
pub mod review;

// Re-exports
pub use menu::*;
pub use order::*;
pub use payment::*;
pub use profile::*;
pub use restaurant::*;
pub use review::*;
