//! Address autocomplete
//!
//! Debounces keystrokes in the address field into geocoder lookups and
//! keeps the suggestion dropdown consistent with what the user has
//! typed since. Every accepted edit bumps a sequence number; results
//! carrying an older number are discarded.

use std::time::{Duration, Instant};

use hub_client::GeoPlace;

/// Quiet time after the last keystroke before a lookup fires
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// Shortest query worth sending
pub const MIN_QUERY: usize = 3;

/// Dropdown size cap
pub const MAX_SUGGESTIONS: usize = 5;

/// Debounced address suggestion state
#[derive(Debug, Default)]
pub struct AddressAutocomplete {
    query: String,
    pending_since: Option<Instant>,
    seq: u64,
    last_sent: Option<String>,
    suggestions: Vec<GeoPlace>,
    selected: usize,
}

impl AddressAutocomplete {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current address field text.
    ///
    /// Arms the debounce window when the query is long enough; closes
    /// the dropdown when it no longer is.
    pub fn input(&mut self, text: &str, now: Instant) {
        if text == self.query {
            return;
        }
        self.query = text.to_string();
        self.seq += 1;
        if self.query.trim().chars().count() >= MIN_QUERY {
            self.pending_since = Some(now);
        } else {
            self.pending_since = None;
            self.suggestions.clear();
            self.selected = 0;
        }
    }

    /// Hand out a lookup once the window has elapsed.
    ///
    /// Returns the sequence number to echo back through
    /// [`Self::apply_results`] and the query text. The same query is
    /// never handed out twice in a row.
    pub fn take_lookup(&mut self, now: Instant) -> Option<(u64, String)> {
        let since = self.pending_since?;
        if now.saturating_duration_since(since) < DEBOUNCE {
            return None;
        }
        self.pending_since = None;

        let text = self.query.trim().to_string();
        if text.chars().count() < MIN_QUERY {
            return None;
        }
        if self.last_sent.as_deref() == Some(text.as_str()) {
            return None;
        }
        self.last_sent = Some(text.clone());
        Some((self.seq, text))
    }

    /// Install lookup results, unless the query has moved on since
    pub fn apply_results(&mut self, seq: u64, places: Vec<GeoPlace>) -> bool {
        if seq != self.seq {
            tracing::debug!("Discarding stale address lookup");
            return false;
        }
        self.suggestions = places;
        self.suggestions.truncate(MAX_SUGGESTIONS);
        self.selected = 0;
        true
    }

    pub fn suggestions(&self) -> &[GeoPlace] {
        &self.suggestions
    }

    pub fn is_open(&self) -> bool {
        !self.suggestions.is_empty()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.suggestions.is_empty() {
            self.selected = (self.selected + 1) % self.suggestions.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.suggestions.is_empty() {
            self.selected = (self.selected + self.suggestions.len() - 1) % self.suggestions.len();
        }
    }

    /// Take the highlighted suggestion and close the dropdown.
    ///
    /// The chosen text becomes the current query so echoing it back
    /// through [`Self::input`] does not rearm the debounce.
    pub fn choose(&mut self) -> Option<GeoPlace> {
        let place = self.suggestions.get(self.selected).cloned()?;
        self.suggestions.clear();
        self.selected = 0;
        self.pending_since = None;
        self.query = place.display_name.clone();
        self.last_sent = Some(place.display_name.trim().to_string());
        Some(place)
    }

    /// Close the dropdown and cancel any armed lookup
    pub fn dismiss(&mut self) {
        self.suggestions.clear();
        self.selected = 0;
        self.pending_since = None;
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str) -> GeoPlace {
        GeoPlace {
            place_id: None,
            display_name: name.to_string(),
            lat: "19.0760".to_string(),
            lon: "72.8777".to_string(),
        }
    }

    #[test]
    fn short_queries_never_fire() {
        let t0 = Instant::now();
        let mut ac = AddressAutocomplete::new();

        ac.input("ga", t0);
        assert_eq!(ac.take_lookup(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn lookup_fires_once_the_window_elapses() {
        let t0 = Instant::now();
        let mut ac = AddressAutocomplete::new();

        ac.input("gard", t0);
        assert_eq!(ac.take_lookup(t0 + Duration::from_millis(100)), None);

        let (_, text) = ac.take_lookup(t0 + Duration::from_millis(300)).unwrap();
        assert_eq!(text, "gard");

        // Handed out once
        assert_eq!(ac.take_lookup(t0 + Duration::from_millis(400)), None);
    }

    #[test]
    fn retyping_rearms_the_window() {
        let t0 = Instant::now();
        let mut ac = AddressAutocomplete::new();

        ac.input("gard", t0);
        ac.input("garden", t0 + Duration::from_millis(200));

        assert_eq!(ac.take_lookup(t0 + Duration::from_millis(350)), None);
        let (_, text) = ac.take_lookup(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(text, "garden");
    }

    #[test]
    fn unchanged_query_is_not_resent() {
        let t0 = Instant::now();
        let mut ac = AddressAutocomplete::new();

        ac.input("gard", t0);
        assert!(ac.take_lookup(t0 + Duration::from_millis(300)).is_some());

        // Trailing whitespace trims to the same query
        ac.input("gard ", t0 + Duration::from_millis(400));
        assert_eq!(ac.take_lookup(t0 + Duration::from_millis(800)), None);
    }

    #[test]
    fn stale_results_are_discarded() {
        let t0 = Instant::now();
        let mut ac = AddressAutocomplete::new();

        ac.input("gard", t0);
        let (seq, _) = ac.take_lookup(t0 + Duration::from_millis(300)).unwrap();

        // User kept typing before the response came back
        ac.input("garden road", t0 + Duration::from_millis(400));

        assert!(!ac.apply_results(seq, vec![place("Garden City")]));
        assert!(!ac.is_open());
    }

    #[test]
    fn results_cap_and_navigation_wraps() {
        let t0 = Instant::now();
        let mut ac = AddressAutocomplete::new();

        ac.input("garden", t0);
        let (seq, _) = ac.take_lookup(t0 + Duration::from_millis(300)).unwrap();
        let places: Vec<GeoPlace> = (0..7).map(|i| place(&format!("Garden {}", i))).collect();
        assert!(ac.apply_results(seq, places));

        assert_eq!(ac.suggestions().len(), MAX_SUGGESTIONS);
        ac.select_prev();
        assert_eq!(ac.selected(), 4);
        ac.select_next();
        assert_eq!(ac.selected(), 0);
    }

    #[test]
    fn choosing_fills_the_query_and_closes() {
        let t0 = Instant::now();
        let mut ac = AddressAutocomplete::new();

        ac.input("garden", t0);
        let (seq, _) = ac.take_lookup(t0 + Duration::from_millis(300)).unwrap();
        assert!(ac.apply_results(seq, vec![place("Garden Road, Food District")]));

        let chosen = ac.choose().unwrap();
        assert_eq!(chosen.display_name, "Garden Road, Food District");
        assert!(!ac.is_open());

        // Echoing the chosen text back must not rearm a lookup
        ac.input("Garden Road, Food District", t0 + Duration::from_millis(400));
        assert_eq!(ac.take_lookup(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn shrinking_below_the_minimum_closes_the_dropdown() {
        let t0 = Instant::now();
        let mut ac = AddressAutocomplete::new();

        ac.input("garden", t0);
        let (seq, _) = ac.take_lookup(t0 + Duration::from_millis(300)).unwrap();
        assert!(ac.apply_results(seq, vec![place("Garden City")]));
        assert!(ac.is_open());

        ac.input("ga", t0 + Duration::from_millis(400));
        assert!(!ac.is_open());
        assert_eq!(ac.take_lookup(t0 + Duration::from_secs(5)), None);
    }
}
