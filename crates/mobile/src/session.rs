use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use itinerary_map_core::api::HttpStopSource;
use itinerary_map_core::api_types::StopId;
use itinerary_map_core::config::Config;
use itinerary_map_core::error::ConfigError;
use itinerary_map_core::notify::BannerId;
use itinerary_map_core::routing::OsrmClient;
use itinerary_map_core::view::ItineraryView;
use tracing::info;

use crate::host::{HostSpeech, LocationProvider, SpeechSynthesizer};
use crate::logging;
use crate::records::{
    AlertSeverity, ItinerarySelection, LocationFailure, MapLayer, Position, RouteMode,
    SessionSnapshot, StopDetailRecord,
};

#[derive(Debug, thiserror::Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum SessionError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// One itinerary map screen.
#[derive(uniffi::Object)]
pub struct MapSession {
    view: ItineraryView<HttpStopSource, OsrmClient>,
    location: Arc<dyn LocationProvider>,
    panics_seen: AtomicU64,
}

#[uniffi::export(async_runtime = "tokio")]
impl MapSession {
    /// `config_json` may omit any field; missing ones take their defaults.
    #[uniffi::constructor]
    pub fn new(
        config_json: String,
        speech: Arc<dyn SpeechSynthesizer>,
        location: Arc<dyn LocationProvider>,
    ) -> Result<Arc<Self>, SessionError> {
        let config = Config::from_json(&config_json)?;
        info!(
            api = %config.api_base_url,
            routing = %config.routing_base_url,
            "starting map session"
        );

        let view = ItineraryView::connect(config, Arc::new(HostSpeech::new(speech)))?;
        Ok(Arc::new(Self {
            view,
            location,
            panics_seen: AtomicU64::new(logging::panic_count()),
        }))
    }

    /// `None` clears the map, like picking the empty picker entry.
    pub async fn select_itinerary(&self, selection: Option<ItinerarySelection>) {
        self.view.select_itinerary(selection.map(Into::into)).await
    }

    pub async fn change_route_mode(&self, mode: RouteMode) {
        self.view.change_route_mode(mode.into()).await
    }

    pub async fn change_base_layer(&self, layer: MapLayer) {
        self.view.change_base_layer(layer.into()).await
    }

    pub async fn reset_view(&self) {
        self.view.reset_view().await
    }

    /// Asks the host for the user's position. The answer arrives through
    /// [`Self::location_found`] or [`Self::location_failed`].
    pub async fn locate_user(&self) {
        let supported = self.location.is_supported();
        if let Some(request) = self.view.begin_locate(supported).await {
            self.location.request_position(request.into());
        }
    }

    pub async fn location_found(&self, position: Position) {
        self.view.finish_locate(Ok(position.into())).await
    }

    pub async fn location_failed(&self, failure: LocationFailure) {
        self.view.finish_locate(Err(failure.into())).await
    }

    pub async fn open_stop_detail(&self, stop_id: i64) -> Option<StopDetailRecord> {
        self.view
            .open_stop_detail(StopId::new(stop_id))
            .await
            .map(StopDetailRecord::from)
    }

    pub async fn close_stop_detail(&self) {
        self.view.close_stop_detail().await
    }

    pub async fn speak(&self) {
        self.view.speak_stop_description().await
    }

    pub async fn stop_speaking(&self) {
        self.view.stop_speaking().await
    }

    pub async fn speech_ended(&self, utterance: u64) {
        self.view.speech_ended(utterance).await
    }

    pub async fn speech_failed(&self, utterance: u64, message: String) {
        self.view.speech_failed(utterance, message).await
    }

    pub async fn reset_speech_buttons(&self) {
        self.view.reset_speech_buttons().await
    }

    pub async fn show_alert(&self, message: String, severity: AlertSeverity) -> u64 {
        self.view.show_alert(message, severity.into()).await.get()
    }

    pub async fn dismiss_alert(&self, id: u64) -> bool {
        self.view.dismiss_alert(BannerId::from(id)).await
    }

    pub async fn show_loading(&self) {
        self.view.show_loading().await
    }

    pub async fn hide_loading(&self) {
        self.view.hide_loading().await
    }

    /// For the host's own uncaught-error handler.
    pub async fn report_unexpected_error(&self) {
        self.view.report_unexpected_error().await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        if logging::catch_up(&self.panics_seen, logging::panic_count()) {
            self.view.report_unexpected_error().await;
        }
        self.view.snapshot().await.into()
    }
}
