use itinerary_api_types::{Stop, StopId};

use crate::map::LatLng;
use crate::map::style::{ACTIVE_STOP, INACTIVE_STOP, MarkerStyle, USER_LOCATION, WHITE};

const STOP_RADIUS: f32 = 15.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    /// Pixel offset from the anchor; tooltips open above the marker.
    pub offset: (i32, i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StopMarker {
    pub stop_id: StopId,
    pub position: LatLng,
    /// Number drawn on the disc: the stop's position within its day.
    pub label: String,
    pub tooltip: Tooltip,
    pub style: MarkerStyle,
    pub class_name: &'static str,
    /// Stop whose detail view opens on click. `None` for inactive days.
    pub on_click: Option<StopId>,
}

impl StopMarker {
    pub fn is_interactive(&self) -> bool {
        self.on_click.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationMarker {
    pub position: LatLng,
    pub popup: String,
    pub style: MarkerStyle,
}

impl LocationMarker {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            popup: "Your Location".to_owned(),
            style: MarkerStyle::disc(USER_LOCATION, 12.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Stop(StopMarker),
    UserLocation(LocationMarker),
}

impl Overlay {
    pub fn position(&self) -> LatLng {
        match self {
            Overlay::Stop(marker) => marker.position,
            Overlay::UserLocation(marker) => marker.position,
        }
    }

    pub fn as_stop(&self) -> Option<&StopMarker> {
        match self {
            Overlay::Stop(marker) => Some(marker),
            Overlay::UserLocation(_) => None,
        }
    }
}

/// Builds the marker for one stop. Colour, tooltip and clickability depend
/// only on whether the stop's day is active.
pub fn render_stop(stop: &Stop) -> StopMarker {
    let active = stop.is_day_active;

    let tooltip = if active {
        format!("Day {}: {}", stop.day_number, stop.name)
    } else {
        format!("Day {}: {} (Inactive)", stop.day_number, stop.name)
    };

    StopMarker {
        stop_id: stop.id,
        position: LatLng::new(stop.latitude, stop.longitude),
        label: stop.order_in_day.to_string(),
        tooltip: Tooltip {
            text: tooltip,
            offset: (0, -15),
        },
        style: MarkerStyle::disc(if active { ACTIVE_STOP } else { INACTIVE_STOP }, STOP_RADIUS)
            .with_fill_opacity(0.8)
            .with_border(3.0, WHITE),
        class_name: if active { "active-marker" } else { "inactive-marker" },
        on_click: active.then_some(stop.id),
    }
}
