//! # itinerary-api-types
//!
//! Wire types shared between the itinerary server, the road-routing service
//! and the map presentation core.
//!
//! ## Example
//!
//! ```
//! use itinerary_api_types::prelude::*;
//!
//! let body = r#"[{
//!     "id": 7,
//!     "name": "Badshahi Mosque",
//!     "description": null,
//!     "latitude": 31.5879,
//!     "longitude": 74.3107,
//!     "day_number": 1,
//!     "is_day_active": true,
//!     "image_filename": null,
//!     "order_in_day": 1
//! }]"#;
//!
//! let stops: Vec<Stop> = serde_json::from_str(body).unwrap();
//! assert_eq!(stops[0].id, StopId::new(7));
//! assert!(stops[0].is_day_active);
//! ```

pub mod identifiers;
pub mod osrm;
pub mod stop;

pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::osrm::{RouteCandidate, RouteGeometry, RouteResponse};
    pub use crate::stop::Stop;
}

pub use prelude::*;
