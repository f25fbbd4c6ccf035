//! Client configuration

/// Client configuration for connecting to the backend hub
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// REST base URL (e.g., "http://localhost:54321")
    pub base_url: String,

    /// Project API key, sent with every request
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Change feed TCP address (e.g., "localhost:54322")
    pub feed_addr: Option<String>,

    /// Geocoding service base URL
    pub geocode_url: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: 30,
            feed_addr: None,
            geocode_url: "https://nominatim.openstreetmap.org".to_string(),
        }
    }

    /// Set the change feed TCP address
    pub fn with_feed_addr(mut self, addr: impl Into<String>) -> Self {
        self.feed_addr = Some(addr.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the geocoding service base URL
    pub fn with_geocode_url(mut self, url: impl Into<String>) -> Self {
        self.geocode_url = url.into();
        self
    }

    /// Create a REST client from this configuration
    pub fn build_rest_client(&self) -> super::RestClient {
        super::RestClient::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:54321", "")
    }
}
