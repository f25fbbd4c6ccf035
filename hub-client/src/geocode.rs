//! Address search
//!
//! Free-text address lookup against a Nominatim-compatible endpoint.

use serde::Deserialize;

use crate::{ClientConfig, ClientResult};

/// A place returned by the address search
#[derive(Debug, Clone, Deserialize)]
pub struct GeoPlace {
    #[serde(default)]
    pub place_id: Option<i64>,
    pub display_name: String,
    /// Coordinates arrive as strings on the wire
    pub lat: String,
    pub lon: String,
}

impl GeoPlace {
    /// Parsed coordinates, if the service returned valid numbers
    pub fn coords(&self) -> Option<(f64, f64)> {
        Some((self.lat.parse().ok()?, self.lon.parse().ok()?))
    }
}

/// Address search client
#[derive(Debug, Clone)]
pub struct GeoClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeoClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Self {
        // The public service rejects requests without an identifying agent
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .user_agent(concat!("foodiehub/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.geocode_url.clone(),
        }
    }

    /// Search for addresses matching free text
    pub async fn search(&self, text: &str, limit: usize) -> ClientResult<Vec<GeoPlace>> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let limit = limit.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("q", text),
                ("limit", limit.as_str()),
                ("addressdetails", "1"),
            ])
            .send()
            .await?
            .error_for_status()?;

        response.json().await.map_err(Into::into)
    }

    /// Resolve coordinates back into a display address
    pub async fn reverse(&self, lat: f64, lon: f64) -> ClientResult<GeoPlace> {
        let url = format!("{}/reverse", self.base_url.trim_end_matches('/'));
        let lat = lat.to_string();
        let lon = lon.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("format", "json"),
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        response.json().await.map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_parses_coordinates() {
        let place: GeoPlace = serde_json::from_str(
            r#"{"place_id": 123, "display_name": "Food District, Mumbai", "lat": "19.0760", "lon": "72.8777"}"#,
        )
        .unwrap();

        let (lat, lon) = place.coords().unwrap();
        assert!((lat - 19.0760).abs() < 1e-9);
        assert!((lon - 72.8777).abs() < 1e-9);
    }

    #[test]
    fn bad_coordinates_are_none() {
        let place = GeoPlace {
            place_id: None,
            display_name: "Nowhere".to_string(),
            lat: "not-a-number".to_string(),
            lon: "72.0".to_string(),
        };
        assert!(place.coords().is_none());
    }
}
