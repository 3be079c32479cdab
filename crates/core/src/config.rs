use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::map::LatLng;

/// Runtime settings handed over by the host as JSON.
///
/// Every field is optional in the JSON document; durations are expressed in
/// milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Origin of the itinerary server, e.g. `http://127.0.0.1:5000`.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Origin of the OSRM-compatible road-routing service.
    #[serde(default = "default_routing_base_url")]
    pub routing_base_url: String,

    /// Path under which stop images are served.
    #[serde(default = "default_image_base_path")]
    pub image_base_path: String,

    /// Pause between consecutive routing requests, so the public routing
    /// service does not rate-limit us.
    #[serde(default = "default_segment_delay", deserialize_with = "millis")]
    pub segment_delay: Duration,

    /// Cosmetic pause between finishing a render and hiding the loading
    /// overlay.
    #[serde(default = "default_loading_delay", deserialize_with = "millis")]
    pub loading_delay: Duration,

    #[serde(default = "default_alert_timeout", deserialize_with = "millis")]
    pub alert_timeout: Duration,

    #[serde(default = "default_request_timeout", deserialize_with = "millis")]
    pub request_timeout: Duration,

    #[serde(default = "default_geolocation_timeout", deserialize_with = "millis")]
    pub geolocation_timeout: Duration,

    #[serde(default = "default_center")]
    pub default_center: LatLng,

    #[serde(default = "default_zoom")]
    pub default_zoom: u8,

    #[serde(default = "default_locate_zoom")]
    pub locate_zoom: u8,

    /// Screen-space padding, in pixels, applied when fitting the viewport
    /// to the stops.
    #[serde(default = "default_fit_padding")]
    pub fit_padding: u32,

    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,

    #[serde(default = "default_speech_pitch")]
    pub speech_pitch: f32,

    #[serde(default = "default_speech_volume")]
    pub speech_volume: f32,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// One HTTP client shared by the stop source and the routing client.
    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        Ok(reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            routing_base_url: default_routing_base_url(),
            image_base_path: default_image_base_path(),
            segment_delay: default_segment_delay(),
            loading_delay: default_loading_delay(),
            alert_timeout: default_alert_timeout(),
            request_timeout: default_request_timeout(),
            geolocation_timeout: default_geolocation_timeout(),
            default_center: default_center(),
            default_zoom: default_zoom(),
            locate_zoom: default_locate_zoom(),
            fit_padding: default_fit_padding(),
            speech_rate: default_speech_rate(),
            speech_pitch: default_speech_pitch(),
            speech_volume: default_speech_volume(),
        }
    }
}

fn millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_millis)
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_owned()
}

fn default_routing_base_url() -> String {
    "https://router.project-osrm.org".to_owned()
}

fn default_image_base_path() -> String {
    "/static/uploads".to_owned()
}

fn default_segment_delay() -> Duration {
    Duration::from_millis(200)
}

fn default_loading_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_alert_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(15)
}

fn default_geolocation_timeout() -> Duration {
    Duration::from_secs(10)
}

// New York City
fn default_center() -> LatLng {
    LatLng::new(40.7128, -74.0060)
}

fn default_zoom() -> u8 {
    10
}

fn default_locate_zoom() -> u8 {
    15
}

fn default_fit_padding() -> u32 {
    20
}

fn default_speech_rate() -> f32 {
    0.9
}

fn default_speech_pitch() -> f32 {
    1.0
}

fn default_speech_volume() -> f32 {
    1.0
}
