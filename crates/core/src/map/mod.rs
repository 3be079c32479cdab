//! The map canvas: one base layer, a marker group and a route group.

pub mod marker;
pub mod scene;
pub mod style;

use geo::{BoundingRect, MultiPoint, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::routing::{RouteSegment, RouteSet};

pub use marker::{LocationMarker, Overlay, StopMarker, Tooltip};
pub use scene::MapScene;

/// A WGS84 position in the order map widgets expect it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<LatLng> for Point {
    fn from(value: LatLng) -> Self {
        Point::new(value.lng, value.lat)
    }
}

impl From<Point> for LatLng {
    fn from(value: Point) -> Self {
        LatLng::new(value.y(), value.x())
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum BaseLayer {
    #[default]
    Street,
    Satellite,
    Topo,
}

impl BaseLayer {
    pub fn tile_url_template(self) -> &'static str {
        match self {
            BaseLayer::Street => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            BaseLayer::Satellite => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            BaseLayer::Topo => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
        }
    }

    pub fn attribution(self) -> &'static str {
        match self {
            BaseLayer::Street => "© OpenStreetMap contributors",
            BaseLayer::Satellite => {
                "© Esri, Maxar, GeoEye, Earthstar Geographics, CNES/Airbus DS, USDA, USGS, AeroGRID, IGN, and the GIS User Community"
            }
            BaseLayer::Topo => "© OpenTopoMap (CC-BY-SA)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    Center {
        center: LatLng,
        zoom: u8,
    },
    /// Fit the box on screen, keeping `padding` pixels free on every side.
    Bounds {
        south_west: LatLng,
        north_east: LatLng,
        padding: u32,
    },
}

/// An ordered, clearable collection of overlays of one kind.
#[derive(Debug, Clone)]
pub struct LayerGroup<T> {
    layers: Vec<T>,
}

impl<T> LayerGroup<T> {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    pub fn add(&mut self, layer: T) {
        self.layers.push(layer);
    }

    pub fn clear(&mut self) {
        self.layers.clear();
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.layers.iter()
    }
}

impl<T> Default for LayerGroup<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Extend<T> for LayerGroup<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.layers.extend(iter);
    }
}

pub struct MapCanvas {
    base_layer: BaseLayer,
    markers: LayerGroup<Overlay>,
    routes: LayerGroup<RouteSegment>,
    viewport: Viewport,
    default_center: LatLng,
    default_zoom: u8,
    fit_padding: u32,
}

impl MapCanvas {
    pub fn new(config: &Config) -> Self {
        Self {
            base_layer: BaseLayer::default(),
            markers: LayerGroup::new(),
            routes: LayerGroup::new(),
            viewport: Viewport::Center {
                center: config.default_center,
                zoom: config.default_zoom,
            },
            default_center: config.default_center,
            default_zoom: config.default_zoom,
            fit_padding: config.fit_padding,
        }
    }

    pub fn base_layer(&self) -> BaseLayer {
        self.base_layer
    }

    /// Replaces the attached base layer; the previous one is detached.
    pub fn set_base_layer(&mut self, layer: BaseLayer) {
        if self.base_layer != layer {
            debug!(from = %self.base_layer, to = %layer, "switching base layer");
        }
        self.base_layer = layer;
    }

    pub fn markers(&self) -> &LayerGroup<Overlay> {
        &self.markers
    }

    pub fn routes(&self) -> &LayerGroup<RouteSegment> {
        &self.routes
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn add_marker(&mut self, overlay: Overlay) {
        self.markers.add(overlay);
    }

    pub fn add_route(&mut self, segment: RouteSegment) {
        self.routes.add(segment);
    }

    pub fn add_routes(&mut self, routes: RouteSet) {
        self.routes.extend(routes.into_segments());
    }

    /// Empties both overlay groups.
    pub fn clear(&mut self) {
        self.markers.clear();
        self.routes.clear();
    }

    pub fn clear_routes(&mut self) {
        self.routes.clear();
    }

    /// Fits the viewport to the bounding box of `points`. Returns `false`
    /// and leaves the viewport alone when there is nothing to fit.
    pub fn fit_bounds(&mut self, points: &[LatLng]) -> bool {
        let multi: MultiPoint = points.iter().map(|point| Point::from(*point)).collect();
        let Some(rect) = multi.bounding_rect() else {
            return false;
        };

        self.viewport = Viewport::Bounds {
            south_west: LatLng::new(rect.min().y, rect.min().x),
            north_east: LatLng::new(rect.max().y, rect.max().x),
            padding: self.fit_padding,
        };
        true
    }

    pub fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.viewport = Viewport::Center { center, zoom };
    }

    pub fn reset_to_default(&mut self) {
        self.set_view(self.default_center, self.default_zoom);
    }

    pub fn scene(&self) -> MapScene {
        MapScene {
            base_layer: self.base_layer,
            markers: self.markers.iter().cloned().collect(),
            routes: self.routes.iter().cloned().collect(),
            viewport: self.viewport,
        }
    }
}
