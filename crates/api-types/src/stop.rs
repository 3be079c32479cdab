use serde::{Deserialize, Serialize};

use crate::identifiers::{ItineraryId, StopId};

/// A point of interest inside one day of an itinerary, as served by
/// `GET /api/stops/{itinerary_id}`.
///
/// The endpoint orders records by `(day_number, order_in_day)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    // The stop endpoint omits this; it is implied by the request path.
    #[serde(default)]
    pub itinerary_id: Option<ItineraryId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub day_number: u32,
    #[serde(default = "default_order_in_day")]
    pub order_in_day: u32,
    #[serde(default)]
    pub is_day_active: bool,
    #[serde(default)]
    pub image_filename: Option<String>,
}

fn default_order_in_day() -> u32 {
    1
}

impl Stop {
    /// Description text worth reading aloud, if any.
    pub fn readable_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
