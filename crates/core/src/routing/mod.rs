//! Road-following routes between consecutive stops.
//!
//! Each pair of neighbouring stops is resolved on its own against an
//! OSRM-compatible service. A pair that cannot be resolved is drawn as a
//! dashed straight line instead, without affecting its neighbours.

pub mod client;
pub mod pipeline;
pub mod segment;

use std::future::Future;

use crate::error::RoutingError;
use crate::map::LatLng;

pub use client::OsrmClient;
pub use pipeline::{RoutePipeline, RouteSet, SegmentSink};
pub use segment::{PathGeometry, Popup, RouteSegment};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
}

impl TravelMode {
    pub fn label(self) -> &'static str {
        match self {
            TravelMode::Driving => "Driving route",
            TravelMode::Walking => "Walking route",
        }
    }
}

/// Looks up one road path between two points.
pub trait RoutingService: Send + Sync {
    fn route(
        &self,
        from: LatLng,
        to: LatLng,
        mode: TravelMode,
    ) -> impl Future<Output = Result<PathGeometry, RoutingError>> + Send;
}
