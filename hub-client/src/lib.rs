//! Hub Client - backend access for the FoodieHub app
//!
//! REST reads and writes, email/password auth, row change subscriptions
//! and address search against the backend hub.

pub mod auth;
pub mod config;
pub mod error;
pub mod geocode;
pub mod http;
pub mod query;
pub mod realtime;
pub mod store;

pub use auth::{AuthClient, AuthUser, Session};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use geocode::{GeoClient, GeoPlace};
pub use http::RestClient;
pub use query::{Query, SortDir};
pub use realtime::{FeedClient, FeedError, LocalFeed, Subscription};
pub use store::{DataStore, DataStoreExt, MemoryStore, RestStore};

// Re-export shared wire types for convenience
pub use shared::realtime::{ChangeFilter, ChangeKind, FeedFrame, FrameType, RowChange};
