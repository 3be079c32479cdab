//! Immutable snapshot of the map canvas for the host renderer.
//!
//! Hosts backed by a GeoJSON-driven map widget can feed
//! [`MapScene::to_geojson`] straight into a source; others walk the typed
//! fields.

use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject};
use serde_json::json;

use crate::map::style::hex;
use crate::map::{BaseLayer, Overlay, Viewport};
use crate::routing::RouteSegment;

#[derive(Debug, Clone, PartialEq)]
pub struct MapScene {
    pub base_layer: BaseLayer,
    pub markers: Vec<Overlay>,
    pub routes: Vec<RouteSegment>,
    pub viewport: Viewport,
}

impl MapScene {
    pub fn to_geojson(&self) -> FeatureCollection {
        let features = self
            .routes
            .iter()
            .map(route_feature)
            .chain(self.markers.iter().map(marker_feature))
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

fn marker_feature(overlay: &Overlay) -> Feature {
    let point = Point::from(overlay.position());
    let properties = match overlay {
        Overlay::Stop(marker) => json!({
            "kind": "stop",
            "stop_id": marker.stop_id.get(),
            "label": marker.label,
            "tooltip": marker.tooltip.text,
            "fill": hex(marker.style.fill),
            "fill_opacity": marker.style.fill_opacity,
            "radius": marker.style.radius,
            "stroke": hex(marker.style.border_color),
            "stroke_width": marker.style.border_width,
            "class_name": marker.class_name,
            "interactive": marker.is_interactive(),
        }),
        Overlay::UserLocation(marker) => json!({
            "kind": "user_location",
            "popup": marker.popup,
            "fill": hex(marker.style.fill),
            "radius": marker.style.radius,
        }),
    };

    feature(Geometry::new(geojson::Value::from(&point)), properties)
}

fn route_feature(segment: &RouteSegment) -> Feature {
    let line: LineString = segment
        .polyline
        .iter()
        .map(|position| Point::from(*position))
        .collect();

    let properties = json!({
        "kind": "route",
        "segment": segment.index + 1,
        "fallback": segment.is_fallback,
        "distance_km": segment.distance_km,
        "duration_min": segment.duration_min,
        "stroke": hex(segment.style.color),
        "stroke_width": segment.style.weight,
        "stroke_opacity": segment.style.opacity,
        "dash": segment.style.dash.map(|dash| dash.to_string()),
        "popup_title": segment.popup.title,
        "popup_lines": segment.popup.lines,
    });

    feature(Geometry::new(geojson::Value::from(&line)), properties)
}

fn feature(geometry: Geometry, properties: serde_json::Value) -> Feature {
    let properties: Option<JsonObject> = match properties {
        serde_json::Value::Object(map) => Some(map),
        _ => None,
    };

    Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties,
        foreign_members: None,
    }
}
