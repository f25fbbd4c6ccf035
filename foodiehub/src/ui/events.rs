//! App events
//!
//! Background work reports its completion to the UI task through these,
//! over an unbounded channel drained between frames. Errors cross as
//! display strings; the UI surfaces them once in the notice line.

use hub_client::GeoPlace;
use shared::models::{Profile, Restaurant};

use crate::views::menu::MenuPayload;
use crate::views::orders::OrderEntry;
use crate::views::tracking::TrackingPayload;

/// A completed piece of background work
#[derive(Debug)]
pub enum AppEvent {
    RestaurantsLoaded(Vec<Restaurant>),
    MenuLoaded {
        restaurant_id: String,
        result: Result<MenuPayload, String>,
    },
    OrdersLoaded(Result<Vec<OrderEntry>, String>),
    TrackingLoaded {
        order_id: String,
        result: Result<TrackingPayload, String>,
    },
    ProfileLoaded(Result<Option<Profile>, String>),
    ProfileSaved(Result<Profile, String>),
    /// Checkout finished; `Ok` carries the new order id
    OrderPlaced(Result<String, String>),
    /// Geocoder results for an autocomplete lookup
    Suggestions { seq: u64, places: Vec<GeoPlace> },
    /// Reverse geocode filled in a textual address
    AddressResolved(String),
    AuthFailed(String),
    SignedUp { confirmed: bool },
}
