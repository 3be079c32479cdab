use std::future::Future;

use tracing::debug;

use itinerary_api_types::{ItineraryId, Stop};

use crate::error::FetchError;

/// Source of an itinerary's stop list.
pub trait StopSource: Send + Sync {
    fn fetch_stops(
        &self,
        itinerary: ItineraryId,
    ) -> impl Future<Output = Result<Vec<Stop>, FetchError>> + Send;
}

/// Reads stops from the itinerary server's JSON API.
#[derive(Clone)]
pub struct HttpStopSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStopSource {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn stops_url(&self, itinerary: ItineraryId) -> String {
        format!(
            "{}/api/stops/{itinerary}",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl StopSource for HttpStopSource {
    async fn fetch_stops(&self, itinerary: ItineraryId) -> Result<Vec<Stop>, FetchError> {
        let url = self.stops_url(itinerary);
        debug!(%url, "fetching stops");

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
