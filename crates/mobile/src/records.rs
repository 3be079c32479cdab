//! Plain data crossing the FFI boundary, mirrored from the core types.

use itinerary_map_core::api_types::ItineraryId;
use itinerary_map_core::day::DaySummary;
use itinerary_map_core::error::GeolocationError;
use itinerary_map_core::map::style::hex;
use itinerary_map_core::map::{BaseLayer, LatLng, Overlay, Viewport};
use itinerary_map_core::notify::{Banner, Severity};
use itinerary_map_core::routing::{RouteSegment, TravelMode};
use itinerary_map_core::speech::{SpeechButtons, SpeechState};
use itinerary_map_core::view::{
    ItineraryOption, LocateRequest, StopDetail, StopImage, ViewSnapshot, ViewState,
};

#[derive(Debug, Clone, Copy, PartialEq, uniffi::Record)]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLng> for Position {
    fn from(value: LatLng) -> Self {
        Self {
            lat: value.lat,
            lng: value.lng,
        }
    }
}

impl From<Position> for LatLng {
    fn from(value: Position) -> Self {
        LatLng::new(value.lat, value.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum RouteMode {
    Driving,
    Walking,
}

impl From<RouteMode> for TravelMode {
    fn from(value: RouteMode) -> Self {
        match value {
            RouteMode::Driving => TravelMode::Driving,
            RouteMode::Walking => TravelMode::Walking,
        }
    }
}

impl From<TravelMode> for RouteMode {
    fn from(value: TravelMode) -> Self {
        match value {
            TravelMode::Driving => RouteMode::Driving,
            TravelMode::Walking => RouteMode::Walking,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum MapLayer {
    Street,
    Satellite,
    Topo,
}

impl From<MapLayer> for BaseLayer {
    fn from(value: MapLayer) -> Self {
        match value {
            MapLayer::Street => BaseLayer::Street,
            MapLayer::Satellite => BaseLayer::Satellite,
            MapLayer::Topo => BaseLayer::Topo,
        }
    }
}

impl From<BaseLayer> for MapLayer {
    fn from(value: BaseLayer) -> Self {
        match value {
            BaseLayer::Street => MapLayer::Street,
            BaseLayer::Satellite => MapLayer::Satellite,
            BaseLayer::Topo => MapLayer::Topo,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum AlertSeverity {
    Success,
    Info,
    Warning,
    Danger,
}

impl From<AlertSeverity> for Severity {
    fn from(value: AlertSeverity) -> Self {
        match value {
            AlertSeverity::Success => Severity::Success,
            AlertSeverity::Info => Severity::Info,
            AlertSeverity::Warning => Severity::Warning,
            AlertSeverity::Danger => Severity::Danger,
        }
    }
}

impl From<Severity> for AlertSeverity {
    fn from(value: Severity) -> Self {
        match value {
            Severity::Success => AlertSeverity::Success,
            Severity::Info => AlertSeverity::Info,
            Severity::Warning => AlertSeverity::Warning,
            Severity::Danger => AlertSeverity::Danger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LocationFailure {
    Unsupported,
    PermissionDenied,
    PositionUnavailable,
    Timeout,
}

impl From<LocationFailure> for GeolocationError {
    fn from(value: LocationFailure) -> Self {
        match value {
            LocationFailure::Unsupported => GeolocationError::Unsupported,
            LocationFailure::PermissionDenied => GeolocationError::PermissionDenied,
            LocationFailure::PositionUnavailable => GeolocationError::PositionUnavailable,
            LocationFailure::Timeout => GeolocationError::Timeout,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct LocateRequestRecord {
    pub timeout_ms: u64,
    pub high_accuracy: bool,
}

impl From<LocateRequest> for LocateRequestRecord {
    fn from(value: LocateRequest) -> Self {
        Self {
            timeout_ms: u64::try_from(value.timeout.as_millis()).unwrap_or(u64::MAX),
            high_accuracy: value.high_accuracy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ItinerarySelection {
    pub id: i64,
    pub label: String,
}

impl From<ItinerarySelection> for ItineraryOption {
    fn from(value: ItinerarySelection) -> Self {
        Self {
            id: ItineraryId::new(value.id),
            label: value.label,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LoadState {
    NoSelection,
    Loading { itinerary_id: i64 },
    Loaded { itinerary_id: i64 },
    Error { itinerary_id: i64 },
}

impl From<ViewState> for LoadState {
    fn from(value: ViewState) -> Self {
        match value {
            ViewState::NoSelection => LoadState::NoSelection,
            ViewState::Loading(id) => LoadState::Loading {
                itinerary_id: id.get(),
            },
            ViewState::Loaded(id) => LoadState::Loaded {
                itinerary_id: id.get(),
            },
            ViewState::Error(id) => LoadState::Error {
                itinerary_id: id.get(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct StopMarkerRecord {
    pub stop_id: i64,
    pub position: Position,
    pub label: String,
    pub tooltip: String,
    pub tooltip_offset_x: i32,
    pub tooltip_offset_y: i32,
    pub fill_hex: String,
    pub fill_opacity: f32,
    pub radius: f32,
    pub border_hex: String,
    pub border_width: f32,
    pub class_name: String,
    /// Whether tapping the marker opens the stop detail.
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum OverlayRecord {
    Stop {
        marker: StopMarkerRecord,
    },
    UserLocation {
        position: Position,
        popup: String,
        fill_hex: String,
        radius: f32,
    },
}

impl From<Overlay> for OverlayRecord {
    fn from(value: Overlay) -> Self {
        match value {
            Overlay::Stop(marker) => OverlayRecord::Stop {
                marker: StopMarkerRecord {
                    stop_id: marker.stop_id.get(),
                    position: marker.position.into(),
                    clickable: marker.is_interactive(),
                    label: marker.label,
                    tooltip_offset_x: marker.tooltip.offset.0,
                    tooltip_offset_y: marker.tooltip.offset.1,
                    tooltip: marker.tooltip.text,
                    fill_hex: hex(marker.style.fill),
                    fill_opacity: marker.style.fill_opacity,
                    radius: marker.style.radius,
                    border_hex: hex(marker.style.border_color),
                    border_width: marker.style.border_width,
                    class_name: marker.class_name.to_owned(),
                },
            },
            Overlay::UserLocation(marker) => OverlayRecord::UserLocation {
                position: marker.position.into(),
                popup: marker.popup,
                fill_hex: hex(marker.style.fill),
                radius: marker.style.radius,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct RouteRecord {
    pub index: u32,
    pub polyline: Vec<Position>,
    pub distance_km: Option<f64>,
    pub duration_min: Option<u32>,
    pub is_fallback: bool,
    pub color_hex: String,
    pub weight: f32,
    pub opacity: f32,
    /// SVG-style dash array such as `10, 5`; absent for solid lines.
    pub dash_array: Option<String>,
    pub popup_title: String,
    pub popup_lines: Vec<String>,
}

impl From<RouteSegment> for RouteRecord {
    fn from(value: RouteSegment) -> Self {
        Self {
            index: u32::try_from(value.index).unwrap_or(u32::MAX),
            polyline: value.polyline.into_iter().map(Position::from).collect(),
            distance_km: value.distance_km,
            duration_min: value.duration_min,
            is_fallback: value.is_fallback,
            color_hex: hex(value.style.color),
            weight: value.style.weight,
            opacity: value.style.opacity,
            dash_array: value.style.dash.map(|dash| dash.to_string()),
            popup_title: value.popup.title,
            popup_lines: value.popup.lines,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, uniffi::Enum)]
pub enum ViewportRecord {
    Center {
        center: Position,
        zoom: u8,
    },
    Bounds {
        south_west: Position,
        north_east: Position,
        padding: u32,
    },
}

impl From<Viewport> for ViewportRecord {
    fn from(value: Viewport) -> Self {
        match value {
            Viewport::Center { center, zoom } => ViewportRecord::Center {
                center: center.into(),
                zoom,
            },
            Viewport::Bounds {
                south_west,
                north_east,
                padding,
            } => ViewportRecord::Bounds {
                south_west: south_west.into(),
                north_east: north_east.into(),
                padding,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct DayBadge {
    pub day_number: u32,
    pub active: bool,
    pub text: String,
    pub title: String,
    pub class_name: String,
}

impl From<&DaySummary> for DayBadge {
    fn from(value: &DaySummary) -> Self {
        Self {
            day_number: value.day_number,
            active: value.active,
            text: value.badge_text(),
            title: value.badge_title(),
            class_name: value.badge_class().to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct BannerRecord {
    pub id: u64,
    pub message: String,
    pub severity: AlertSeverity,
}

impl From<&Banner> for BannerRecord {
    fn from(value: &Banner) -> Self {
        Self {
            id: value.id.get(),
            message: value.message.clone(),
            severity: value.severity.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Record)]
pub struct SpeechControls {
    pub speak_visible: bool,
    pub stop_visible: bool,
    pub speaking: bool,
    /// Id of the utterance currently being read, if any.
    pub utterance: Option<u64>,
}

impl SpeechControls {
    fn new(buttons: SpeechButtons, state: SpeechState) -> Self {
        let utterance = match state {
            SpeechState::Idle => None,
            SpeechState::Speaking { utterance } => Some(utterance),
        };

        Self {
            speak_visible: buttons.speak_visible,
            stop_visible: buttons.stop_visible,
            speaking: buttons.speaking,
            utterance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct StopDetailRecord {
    pub stop_id: i64,
    pub title: String,
    pub description: String,
    pub day_badge: String,
    /// `None` means the host shows its image placeholder.
    pub image_url: Option<String>,
}

impl From<StopDetail> for StopDetailRecord {
    fn from(value: StopDetail) -> Self {
        Self {
            stop_id: value.stop_id.get(),
            title: value.title,
            description: value.description,
            day_badge: value.day_badge,
            image_url: match value.image {
                StopImage::Url(url) => Some(url),
                StopImage::Placeholder => None,
            },
        }
    }
}

/// Everything the host needs to redraw its UI.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct SessionSnapshot {
    pub state: LoadState,
    pub base_layer: MapLayer,
    pub tile_url_template: String,
    pub attribution: String,
    pub markers: Vec<OverlayRecord>,
    pub routes: Vec<RouteRecord>,
    pub viewport: ViewportRecord,
    /// The map contents as a GeoJSON `FeatureCollection`.
    pub scene_geojson: String,
    pub itinerary_info: Option<String>,
    pub day_progress: Option<Vec<DayBadge>>,
    pub banners: Vec<BannerRecord>,
    pub loading: bool,
    pub route_mode: RouteMode,
    pub speech: SpeechControls,
    pub detail: Option<StopDetailRecord>,
}

impl From<ViewSnapshot> for SessionSnapshot {
    fn from(snapshot: ViewSnapshot) -> Self {
        let scene_geojson = snapshot.scene.to_geojson().to_string();
        let base_layer = snapshot.scene.base_layer;

        Self {
            state: snapshot.state.into(),
            base_layer: base_layer.into(),
            tile_url_template: base_layer.tile_url_template().to_owned(),
            attribution: base_layer.attribution().to_owned(),
            markers: snapshot
                .scene
                .markers
                .into_iter()
                .map(OverlayRecord::from)
                .collect(),
            routes: snapshot
                .scene
                .routes
                .into_iter()
                .map(RouteRecord::from)
                .collect(),
            viewport: snapshot.scene.viewport.into(),
            scene_geojson,
            itinerary_info: snapshot.panels.itinerary_info,
            day_progress: snapshot
                .panels
                .day_progress
                .map(|days| days.iter().map(DayBadge::from).collect()),
            banners: snapshot.banners.iter().map(BannerRecord::from).collect(),
            loading: snapshot.loading,
            route_mode: snapshot.route_mode.into(),
            speech: SpeechControls::new(snapshot.speech, snapshot.speech_state),
            detail: snapshot.detail.map(StopDetailRecord::from),
        }
    }
}
