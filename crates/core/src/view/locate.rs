use std::future::Future;
use std::time::Duration;

use crate::error::GeolocationError;
use crate::map::LatLng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocateRequest {
    pub timeout: Duration,
    pub high_accuracy: bool,
}

/// The host's positioning capability.
pub trait Geolocator: Send + Sync {
    fn is_supported(&self) -> bool;

    fn current_position(
        &self,
        request: LocateRequest,
    ) -> impl Future<Output = Result<LatLng, GeolocationError>> + Send;
}

/// Banner text for a failed lookup.
pub fn failure_message(error: GeolocationError) -> String {
    let cause = match error {
        GeolocationError::Unsupported => {
            return "Geolocation is not supported by this browser.".to_owned();
        }
        GeolocationError::PermissionDenied => "Location access denied.",
        GeolocationError::PositionUnavailable => "Location information unavailable.",
        GeolocationError::Timeout => "Location request timed out.",
    };
    format!("Unable to get your location. {cause}")
}
