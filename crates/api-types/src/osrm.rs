//! Response body of the OSRM `route` service, requested with
//! `overview=full&geometries=geojson`.
//!
//! Only the fields the map needs are decoded; everything else (legs, steps,
//! waypoints) is ignored.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteCandidate>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RouteCandidate {
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub duration: f64,
    pub geometry: RouteGeometry,
}

/// GeoJSON `LineString` geometry. Positions are `[longitude, latitude]`.
#[derive(Clone, Debug, Deserialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

impl RouteResponse {
    /// OSRM lists the best candidate first.
    pub fn best_route(self) -> Option<RouteCandidate> {
        self.routes.into_iter().next()
    }
}
