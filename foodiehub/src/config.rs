//! Application configuration
//!
//! All settings come from environment variables with sensible defaults;
//! an empty API key switches the app into offline demo mode backed by
//! the in-memory store.

use hub_client::ClientConfig;

/// Application configuration
///
/// # Environment variables
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | FOODIEHUB_API_URL | http://localhost:54321 | Backend REST base URL |
/// | FOODIEHUB_API_KEY | (empty) | Project API key; empty = offline demo |
/// | FOODIEHUB_REALTIME_ADDR | localhost:54322 | Change feed TCP address |
/// | FOODIEHUB_GEOCODE_URL | https://nominatim.openstreetmap.org | Address lookup base |
/// | FOODIEHUB_DATA_DIR | .foodiehub | Local state directory (cart draft) |
/// | FOODIEHUB_DELIVERY_FEE | 49.0 | Flat delivery fee |
/// | FOODIEHUB_TAX_RATE | 0.05 | Tax fraction of the subtotal |
/// | FOODIEHUB_ETA_MINUTES | 45 | Estimated delivery window |
/// | FOODIEHUB_OFFLINE | false | Force the in-memory store |
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend REST base URL
    pub api_url: String,
    /// Project API key; empty means offline demo mode
    pub api_key: String,
    /// Change feed TCP address
    pub realtime_addr: String,
    /// Geocoding service base URL
    pub geocode_url: String,
    /// Directory for local state (cart draft)
    pub data_dir: String,
    /// Force offline mode even with an API key set
    pub offline: bool,
    /// Checkout pricing rules
    pub pricing: OrderPricing,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("FOODIEHUB_API_URL")
                .unwrap_or_else(|_| "http://localhost:54321".into()),
            api_key: std::env::var("FOODIEHUB_API_KEY").unwrap_or_default(),
            realtime_addr: std::env::var("FOODIEHUB_REALTIME_ADDR")
                .unwrap_or_else(|_| "localhost:54322".into()),
            geocode_url: std::env::var("FOODIEHUB_GEOCODE_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".into()),
            data_dir: std::env::var("FOODIEHUB_DATA_DIR").unwrap_or_else(|_| ".foodiehub".into()),
            offline: std::env::var("FOODIEHUB_OFFLINE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            pricing: OrderPricing {
                delivery_fee: std::env::var("FOODIEHUB_DELIVERY_FEE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(49.0),
                tax_rate: std::env::var("FOODIEHUB_TAX_RATE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0.05),
                eta_minutes: std::env::var("FOODIEHUB_ETA_MINUTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(45),
            },
        }
    }

    /// Configuration with an explicit data directory and offline flag,
    /// everything else default. Used by tests.
    pub fn with_overrides(data_dir: impl Into<String>, offline: bool) -> Self {
        Self {
            data_dir: data_dir.into(),
            offline,
            ..Self::default()
        }
    }

    /// Whether the app should run against the in-memory store
    pub fn is_offline(&self) -> bool {
        self.offline || self.api_key.is_empty()
    }

    /// Derive the backend client configuration
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url, &self.api_key)
            .with_feed_addr(&self.realtime_addr)
            .with_geocode_url(&self.geocode_url)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:54321".into(),
            api_key: String::new(),
            realtime_addr: "localhost:54322".into(),
            geocode_url: "https://nominatim.openstreetmap.org".into(),
            data_dir: ".foodiehub".into(),
            offline: false,
            pricing: OrderPricing::default(),
        }
    }
}

/// Checkout pricing rules
///
/// The delivery fee is flat and the tax is a fraction of the subtotal,
/// matching what the backend expects on the order row.
#[derive(Debug, Clone, Copy)]
pub struct OrderPricing {
    pub delivery_fee: f64,
    /// Tax as a fraction of the subtotal
    pub tax_rate: f64,
    /// Estimated delivery window in minutes
    pub eta_minutes: i64,
}

impl OrderPricing {
    /// Tax owed on a subtotal
    pub fn tax(&self, subtotal: f64) -> f64 {
        subtotal * self.tax_rate
    }

    /// Grand total: subtotal + delivery fee + tax
    pub fn total(&self, subtotal: f64) -> f64 {
        subtotal + self.delivery_fee + self.tax(subtotal)
    }

    /// Estimated delivery timestamp counted from `from`
    pub fn estimated_delivery(
        &self,
        from: chrono::DateTime<chrono::Utc>,
    ) -> chrono::DateTime<chrono::Utc> {
        from + chrono::Duration::minutes(self.eta_minutes)
    }
}

impl Default for OrderPricing {
    fn default() -> Self {
        Self {
            delivery_fee: 49.0,
            tax_rate: 0.05,
            eta_minutes: 45,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pricing_totals() {
        let pricing = OrderPricing::default();
        assert!((pricing.tax(200.0) - 10.0).abs() < 1e-9);
        assert!((pricing.total(200.0) - 259.0).abs() < 1e-9);
    }

    #[test]
    fn estimated_delivery_adds_the_window() {
        let pricing = OrderPricing::default();
        let from = chrono::Utc::now();
        let eta = pricing.estimated_delivery(from);
        assert_eq!((eta - from).num_minutes(), 45);
    }

    #[test]
    fn empty_api_key_means_offline() {
        let config = AppConfig::with_overrides(".test", false);
        assert!(config.is_offline());

        let mut config = AppConfig::default();
        config.api_key = "anon-key".into();
        assert!(!config.is_offline());
        config.offline = true;
        assert!(config.is_offline());
    }

    #[test]
    fn client_config_carries_endpoints() {
        let mut config = AppConfig::default();
        config.api_key = "anon-key".into();
        let client = config.client_config();
        assert_eq!(client.base_url, "http://localhost:54321");
        assert_eq!(client.feed_addr.as_deref(), Some("localhost:54322"));
    }
}
