//! Shared types for FoodieHub
//!
//! The backend data contract (row types for every table the client reads
//! or writes), the realtime feed wire types, and pure helpers used by both
//! the client crate and the app.

pub mod cuisine;
pub mod currency;
pub mod models;
pub mod realtime;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Realtime re-exports (for convenient access)
pub use realtime::{ChangeKind, FeedFrame, FrameType, RowChange};
