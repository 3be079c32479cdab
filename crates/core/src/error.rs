//! Failures the presentation core can observe.
//!
//! Each enum belongs to one boundary (stop API, routing service, speech,
//! geolocation, configuration). The view controller turns all of them into
//! banners; none of them aborts the session.

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("stop request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("stop request returned status {0}")]
    Status(u16),

    #[error("malformed stop list: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RoutingError {
    #[error("routing request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("routing service returned status {0}")]
    Status(u16),

    #[error("malformed routing response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no route found in routing response")]
    NoRoute,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpeechError {
    #[error("speech synthesis is not supported on this device")]
    Unsupported,

    #[error("no description available to read")]
    EmptyText,

    #[error("speech synthesis failed: {0}")]
    Synthesis(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeolocationError {
    #[error("geolocation is not supported")]
    Unsupported,

    #[error("location access denied")]
    PermissionDenied,

    #[error("location information unavailable")]
    PositionUnavailable,

    #[error("location request timed out")]
    Timeout,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("could not build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
