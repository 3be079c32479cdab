use tracing::debug;

use itinerary_api_types::RouteResponse;

use crate::error::RoutingError;
use crate::map::LatLng;
use crate::routing::{PathGeometry, RoutingService, TravelMode};

/// Client for the OSRM `route/v1` HTTP API.
#[derive(Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OsrmClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn route_url(&self, from: LatLng, to: LatLng, mode: TravelMode) -> String {
        format!(
            "{}/route/v1/{mode}/{},{};{},{}?overview=full&geometries=geojson&steps=true",
            self.base_url.trim_end_matches('/'),
            from.lng,
            from.lat,
            to.lng,
            to.lat,
        )
    }
}

impl RoutingService for OsrmClient {
    async fn route(
        &self,
        from: LatLng,
        to: LatLng,
        mode: TravelMode,
    ) -> Result<PathGeometry, RoutingError> {
        let url = self.route_url(from, to, mode);
        debug!(%url, "requesting road route");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let route = serde_json::from_slice::<RouteResponse>(&body)?
            .best_route()
            .ok_or(RoutingError::NoRoute)?;

        Ok(PathGeometry::from(route))
    }
}
