//! Presentation core of the itinerary map.
//!
//! Fetches the stops of the selected itinerary, turns them into markers,
//! resolves road routes between consecutive stops and keeps the resulting
//! map, panel, banner and speech state in one place. Nothing here draws: the
//! host UI renders the snapshots this crate produces and reports user input
//! and platform callbacks back.

pub mod api;
pub mod config;
pub mod day;
pub mod error;
pub mod map;
pub mod notify;
pub mod routing;
pub mod speech;
pub mod view;

pub use itinerary_api_types as api_types;
