use itinerary_api_types::RouteCandidate;

use crate::map::LatLng;
use crate::map::style::{FALLBACK_ROUTE, LineStyle, route_color};
use crate::routing::TravelMode;

/// A decoded road path, already in map (lat, lng) order.
#[derive(Debug, Clone, PartialEq)]
pub struct PathGeometry {
    pub polyline: Vec<LatLng>,
    pub distance_m: f64,
    pub duration_s: f64,
}

impl From<RouteCandidate> for PathGeometry {
    fn from(route: RouteCandidate) -> Self {
        Self {
            polyline: route
                .geometry
                .coordinates
                .into_iter()
                .map(|[lng, lat]| LatLng::new(lat, lng))
                .collect(),
            distance_m: route.distance,
            duration_s: route.duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    /// Zero-based position of the stop pair this segment connects.
    pub index: usize,
    pub polyline: Vec<LatLng>,
    /// Kilometers, one decimal. `None` for straight-line fallbacks.
    pub distance_km: Option<f64>,
    /// Whole minutes. `None` for straight-line fallbacks.
    pub duration_min: Option<u32>,
    pub is_fallback: bool,
    pub style: LineStyle,
    pub popup: Popup,
}

impl RouteSegment {
    pub fn road(index: usize, path: PathGeometry, mode: TravelMode) -> Self {
        let distance_km = (path.distance_m / 100.0).round() / 10.0;
        let duration_min = (path.duration_s / 60.0).round().max(0.0) as u32;

        Self {
            index,
            polyline: path.polyline,
            distance_km: Some(distance_km),
            duration_min: Some(duration_min),
            is_fallback: false,
            style: LineStyle::solid(route_color(index), 5.0, 0.8),
            popup: Popup {
                title: format!("Route Segment {}", index + 1),
                lines: vec![
                    format!("Distance: {distance_km:.1} km"),
                    format!("Duration: {duration_min} min"),
                    mode.label().to_owned(),
                ],
            },
        }
    }

    /// Straight line standing in for one pair whose road path is unknown.
    pub fn fallback(index: usize, from: LatLng, to: LatLng) -> Self {
        Self {
            index,
            polyline: vec![from, to],
            distance_km: None,
            duration_min: None,
            is_fallback: true,
            style: LineStyle::solid(FALLBACK_ROUTE, 3.0, 0.7).dashed(10.0, 5.0),
            popup: Popup {
                title: format!("Direct Path {}", index + 1),
                lines: vec![
                    "Road routing unavailable".to_owned(),
                    "Showing direct line".to_owned(),
                ],
            },
        }
    }

    /// Straight lines through every stop, used when routing broke down as a
    /// whole.
    pub fn direct_path(stops: &[LatLng]) -> Self {
        Self {
            index: 0,
            polyline: stops.to_vec(),
            distance_km: None,
            duration_min: None,
            is_fallback: true,
            style: LineStyle::solid(FALLBACK_ROUTE, 4.0, 0.7).dashed(10.0, 5.0),
            popup: Popup {
                title: "Direct Path Route".to_owned(),
                lines: vec![
                    "Road routing unavailable".to_owned(),
                    "Showing straight lines between stops".to_owned(),
                ],
            },
        }
    }
}
