//! View models
//!
//! Each screen's data logic lives here, free of any terminal concern so
//! it can be driven headless against the in-memory store. The UI shell
//! calls the associated `load` functions from spawned tasks and feeds
//! the payloads back through `apply`; the combined `fetch`/`activate`
//! helpers do both in one await for tests and simple callers.

pub mod checkout;
pub mod menu;
pub mod orders;
pub mod profile;
pub mod restaurants;
pub mod tracking;

/// Load state of the detail views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    Loading,
    NotFound,
    Ready,
}
