//! Cuisine catalog
//!
//! The fixed filter list offered by the restaurant browser. `value` is the
//! exact `cuisine_type` column value; the "all" sentinel bypasses
//! filtering.

/// Sentinel value that disables cuisine filtering.
pub const CUISINE_ALL: &str = "all";

/// One entry of the cuisine filter strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CuisineFilter {
    pub label: &'static str,
    pub value: &'static str,
    pub emoji: &'static str,
}

/// The fixed cuisine filter list, "all" first.
pub const CUISINE_FILTERS: [CuisineFilter; 9] = [
    CuisineFilter { label: "All", value: CUISINE_ALL, emoji: "🍽️" },
    CuisineFilter { label: "Indian", value: "Indian", emoji: "🍛" },
    CuisineFilter { label: "Chinese", value: "Chinese", emoji: "🥡" },
    CuisineFilter { label: "Italian", value: "Italian", emoji: "🍕" },
    CuisineFilter { label: "Mexican", value: "Mexican", emoji: "🌮" },
    CuisineFilter { label: "Japanese", value: "Japanese", emoji: "🍣" },
    CuisineFilter { label: "Thai", value: "Thai", emoji: "🍜" },
    CuisineFilter { label: "American", value: "American", emoji: "🍔" },
    CuisineFilter { label: "Mediterranean", value: "Mediterranean", emoji: "🥙" },
];
