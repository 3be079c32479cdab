//! Kotlin/Swift bindings for the itinerary map.
//!
//! The host owns the actual map widget, speech synthesizer and location
//! services. It drives a [`MapSession`] with user input, re-renders from
//! [`MapSession::snapshot`] and reports platform callbacks back into it.

pub mod host;
pub mod logging;
pub mod records;
pub mod session;

pub use host::{LocationProvider, SpeechSynthesizer, UtteranceRecord};
pub use session::{MapSession, SessionError};

uniffi::setup_scaffolding!();

/// Human-readable date for the itinerary panels, e.g. `March 5, 2024`.
#[uniffi::export]
pub fn format_date(input: String) -> String {
    itinerary_map_core::notify::format_date(&input)
}

/// Escapes text for inclusion in popup and tooltip markup.
#[uniffi::export]
pub fn sanitize_html(text: String) -> String {
    itinerary_map_core::notify::sanitize_html(&text)
}
