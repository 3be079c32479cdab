//! Itinerary view controller.
//!
//! Owns all mutable presentation state and drives the
//! fetch → markers → routes → viewport sequence when the selected itinerary
//! changes, plus the independent side branches (route mode, base layer,
//! locate, reset, stop detail, speech).
//!
//! Long-running work (stop fetch, route resolution) runs without holding the
//! state lock. Every render is tagged with a generation number; a response
//! that arrives after a newer selection (or a newer route rebuild) started
//! is dropped instead of overwriting the newer state. A superseded route job
//! stops issuing requests as soon as it notices.

pub mod detail;
pub mod locate;

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::time::Instant;
use tracing::{debug, error, info};

use itinerary_api_types::{ItineraryId, Stop, StopId};

use crate::api::{HttpStopSource, StopSource};
use crate::config::Config;
use crate::day::{DaySummary, summarize_days};
use crate::error::{ConfigError, FetchError, GeolocationError, SpeechError};
use crate::map::marker::{LocationMarker, render_stop};
use crate::map::{BaseLayer, LatLng, MapCanvas, MapScene, Overlay};
use crate::notify::{Banner, BannerId, Notifications, Severity};
use crate::routing::{
    OsrmClient, RoutePipeline, RouteSegment, RouteSet, RoutingService, SegmentSink, TravelMode,
};
use crate::speech::{SpeechButtons, SpeechController, SpeechEngine, SpeechState};

pub use detail::{StopDetail, StopImage};
pub use locate::{Geolocator, LocateRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    NoSelection,
    Loading(ItineraryId),
    Loaded(ItineraryId),
    /// The fetch failed; whatever was rendered before stays on the map.
    Error(ItineraryId),
}

/// An entry of the itinerary picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryOption {
    pub id: ItineraryId,
    pub label: String,
}

/// Side panels next to the map. `None` means hidden.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Panels {
    pub itinerary_info: Option<String>,
    pub day_progress: Option<Vec<DaySummary>>,
}

/// Everything the host needs to draw one frame of the UI.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub state: ViewState,
    pub scene: MapScene,
    pub panels: Panels,
    pub banners: Vec<Banner>,
    pub loading: bool,
    pub route_mode: TravelMode,
    pub speech: SpeechButtons,
    pub speech_state: SpeechState,
    pub detail: Option<StopDetail>,
}

struct RouteJob {
    generation: u64,
    current: watch::Receiver<u64>,
    stops: Vec<LatLng>,
    mode: TravelMode,
}

/// Feeds resolved segments straight into the route group while the job is
/// still the latest one.
struct CanvasSink<'a> {
    state: &'a Mutex<AppState>,
    generation: u64,
    current: watch::Receiver<u64>,
}

impl SegmentSink for CanvasSink<'_> {
    fn is_current(&self) -> bool {
        *self.current.borrow() == self.generation
    }

    async fn superseded(&self) {
        let mut current = self.current.clone();
        let _ = current
            .wait_for(|generation| *generation != self.generation)
            .await;
    }

    async fn accept(&self, segment: RouteSegment) {
        let mut state = self.state.lock().await;
        if self.is_current() {
            state.canvas.add_route(segment);
        }
    }
}

struct AppState {
    view: ViewState,
    stops: Vec<Stop>,
    canvas: MapCanvas,
    panels: Panels,
    notifications: Notifications,
    speech: SpeechController,
    route_mode: TravelMode,
    detail: Option<StopDetail>,
    selection_generation: u64,
    route_generation: watch::Sender<u64>,
    locate_pending: bool,
}

impl AppState {
    /// Clears the map and draws markers for the current stops. Returns the
    /// route work still to do, if there are at least two stops.
    fn display_stops(&mut self) -> Option<RouteJob> {
        self.canvas.clear();
        self.supersede_routes();

        if self.stops.is_empty() {
            self.notifications
                .show_alert("No stops found for this itinerary", Severity::Warning);
            return None;
        }

        let positions = self.stop_positions();
        for stop in &self.stops {
            self.canvas.add_marker(Overlay::Stop(render_stop(stop)));
        }
        self.canvas.fit_bounds(&positions);

        self.route_job(positions)
    }

    fn route_job(&self, stops: Vec<LatLng>) -> Option<RouteJob> {
        (stops.len() > 1).then(|| RouteJob {
            generation: *self.route_generation.borrow(),
            current: self.route_generation.subscribe(),
            stops,
            mode: self.route_mode,
        })
    }

    /// Invalidates the running route job, if any.
    fn supersede_routes(&self) {
        self.route_generation.send_modify(|generation| *generation += 1);
    }

    fn stop_positions(&self) -> Vec<LatLng> {
        self.stops
            .iter()
            .map(|stop| LatLng::new(stop.latitude, stop.longitude))
            .collect()
    }

    fn surface_speech_error(&mut self, error: SpeechError) {
        let (message, severity) = match error {
            SpeechError::EmptyText => ("No description available to read", Severity::Warning),
            SpeechError::Unsupported => (
                "Speech synthesis is not supported on this device.",
                Severity::Warning,
            ),
            SpeechError::Synthesis(_) => ("Error playing audio. Please try again.", Severity::Danger),
        };
        self.notifications.show_alert(message, severity);
    }
}

pub struct ItineraryView<S, R> {
    config: Config,
    source: S,
    pipeline: RoutePipeline<R>,
    state: Mutex<AppState>,
}

impl ItineraryView<HttpStopSource, OsrmClient> {
    /// Wires the controller to the itinerary server and the OSRM service
    /// named in `config`.
    pub fn connect(config: Config, speech: Arc<dyn SpeechEngine>) -> Result<Self, ConfigError> {
        let http = config.http_client()?;
        let source = HttpStopSource::new(http.clone(), config.api_base_url.clone());
        let router = OsrmClient::new(http, config.routing_base_url.clone());
        Ok(Self::new(config, source, router, speech))
    }
}

impl<S: StopSource, R: RoutingService> ItineraryView<S, R> {
    pub fn new(config: Config, source: S, router: R, speech: Arc<dyn SpeechEngine>) -> Self {
        let state = AppState {
            view: ViewState::NoSelection,
            stops: Vec::new(),
            canvas: MapCanvas::new(&config),
            panels: Panels::default(),
            notifications: Notifications::new(config.alert_timeout),
            speech: SpeechController::new(
                speech,
                config.speech_rate,
                config.speech_pitch,
                config.speech_volume,
            ),
            route_mode: TravelMode::default(),
            detail: None,
            selection_generation: 0,
            route_generation: watch::channel(0).0,
            locate_pending: false,
        };

        Self {
            pipeline: RoutePipeline::new(router, config.segment_delay),
            config,
            source,
            state: Mutex::new(state),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let mut state = self.state.lock().await;
        let banners = state.notifications.visible_banners(Instant::now()).to_vec();

        ViewSnapshot {
            state: state.view,
            scene: state.canvas.scene(),
            panels: state.panels.clone(),
            banners,
            loading: state.notifications.is_loading(),
            route_mode: state.route_mode,
            speech: state.speech.buttons(),
            speech_state: state.speech.state(),
            detail: state.detail.clone(),
        }
    }

    /// Switches the view to another itinerary, or clears it for `None`.
    pub async fn select_itinerary(&self, selection: Option<ItineraryOption>) {
        let Some(option) = selection else {
            let mut state = self.state.lock().await;
            state.selection_generation += 1;
            state.supersede_routes();
            state.canvas.clear();
            state.panels = Panels::default();
            state.stops.clear();
            state.detail = None;
            state.notifications.hide_loading();
            state.view = ViewState::NoSelection;
            return;
        };

        let generation = {
            let mut state = self.state.lock().await;
            state.selection_generation += 1;
            state.notifications.show_loading();
            state.view = ViewState::Loading(option.id);
            state.selection_generation
        };

        let fetched = self.source.fetch_stops(option.id).await;

        let Some(job) = self.apply_stops(generation, &option, fetched).await else {
            return;
        };

        // Routes fill in on their own schedule; the overlay only waits for
        // the markers.
        let routes = async {
            if let Some(job) = job {
                self.render_routes(job).await;
            }
        };
        let settle = async {
            tokio::time::sleep(self.config.loading_delay).await;

            let mut state = self.state.lock().await;
            if state.selection_generation == generation {
                state.notifications.hide_loading();
                state
                    .notifications
                    .show_alert("Itinerary loaded successfully!", Severity::Success);
            }
        };
        tokio::join!(routes, settle);
    }

    /// `None` when the response was stale or the fetch failed; otherwise the
    /// (possibly absent) route work for the new stop set.
    async fn apply_stops(
        &self,
        generation: u64,
        option: &ItineraryOption,
        fetched: Result<Vec<Stop>, FetchError>,
    ) -> Option<Option<RouteJob>> {
        let mut state = self.state.lock().await;
        if state.selection_generation != generation {
            debug!(itinerary = %option.id, "discarding superseded stop response");
            return None;
        }

        let stops = match fetched {
            Ok(stops) => stops,
            Err(err) => {
                error!(itinerary = %option.id, %err, "error loading itinerary");
                state.notifications.hide_loading();
                state
                    .notifications
                    .show_alert("Error loading itinerary. Please try again.", Severity::Danger);
                state.view = ViewState::Error(option.id);
                return None;
            }
        };

        info!(itinerary = %option.id, stops = stops.len(), "rendering itinerary");
        let days = summarize_days(&stops);
        state.stops = stops;
        state.detail = None;
        state.view = ViewState::Loaded(option.id);

        let job = state.display_stops();
        state.panels = Panels {
            itinerary_info: Some(format!("Selected: {}", option.label)),
            day_progress: (!days.is_empty()).then_some(days),
        };

        Some(job)
    }

    async fn render_routes(&self, job: RouteJob) {
        let sink = CanvasSink {
            state: &self.state,
            generation: job.generation,
            current: job.current,
        };

        let routes = self.pipeline.resolve(&job.stops, job.mode, &sink).await;
        let RouteSet::DirectPath(path) = routes else {
            return;
        };

        let mut state = self.state.lock().await;
        if !sink.is_current() {
            debug!("discarding superseded direct path");
            return;
        }
        state.canvas.clear_routes();
        state.canvas.add_routes(RouteSet::DirectPath(path));
    }

    /// Rebuilds the routes of the loaded itinerary with another travel mode.
    /// Markers are left alone.
    pub async fn change_route_mode(&self, mode: TravelMode) {
        let job = {
            let mut state = self.state.lock().await;
            debug!(%mode, "route mode changed");
            state.route_mode = mode;

            if !matches!(state.view, ViewState::Loaded(_)) || state.stops.is_empty() {
                return;
            }

            state
                .notifications
                .show_alert("Updating routes...", Severity::Info);
            state.canvas.clear_routes();
            state.supersede_routes();
            let positions = state.stop_positions();
            state.route_job(positions)
        };

        if let Some(job) = job {
            self.render_routes(job).await;
        }
    }

    pub async fn change_base_layer(&self, layer: BaseLayer) {
        self.state.lock().await.canvas.set_base_layer(layer);
    }

    /// Redraws the current stops and fits them, or returns to the default
    /// view when there are none.
    pub async fn reset_view(&self) {
        let job = {
            let mut state = self.state.lock().await;
            let job = if state.stops.is_empty() {
                state.canvas.reset_to_default();
                None
            } else {
                state.display_stops()
            };
            state
                .notifications
                .show_alert("Map view reset", Severity::Info);
            job
        };

        if let Some(job) = job {
            self.render_routes(job).await;
        }
    }

    pub async fn locate_user<G: Geolocator>(&self, geolocator: &G) {
        let Some(request) = self.begin_locate(geolocator.is_supported()).await else {
            return;
        };
        let position = geolocator.current_position(request).await;
        self.finish_locate(position).await;
    }

    /// First half of [`Self::locate_user`] for hosts that resolve the
    /// position themselves.
    pub async fn begin_locate(&self, supported: bool) -> Option<LocateRequest> {
        let mut state = self.state.lock().await;
        if !supported {
            state.notifications.show_alert(
                locate::failure_message(GeolocationError::Unsupported),
                Severity::Warning,
            );
            return None;
        }

        state.locate_pending = true;
        state.notifications.show_loading();
        Some(LocateRequest {
            timeout: self.config.geolocation_timeout,
            high_accuracy: true,
        })
    }

    /// Second half of [`Self::locate_user`]. Results that do not answer a
    /// request from [`Self::begin_locate`] are ignored.
    pub async fn finish_locate(&self, position: Result<LatLng, GeolocationError>) {
        let mut state = self.state.lock().await;
        if !std::mem::take(&mut state.locate_pending) {
            debug!("ignoring location result without a pending request");
            return;
        }

        match position {
            Ok(position) => {
                state
                    .canvas
                    .add_marker(Overlay::UserLocation(LocationMarker::new(position)));
                state.canvas.set_view(position, self.config.locate_zoom);
                state
                    .notifications
                    .show_alert("Location found!", Severity::Success);
            }
            Err(err) => {
                state
                    .notifications
                    .show_alert(locate::failure_message(err), Severity::Warning);
            }
        }
        state.notifications.hide_loading();
    }

    /// Opens the detail view of an active stop. Stops on inactive days are
    /// not clickable and yield `None`.
    pub async fn open_stop_detail(&self, stop_id: StopId) -> Option<StopDetail> {
        let mut state = self.state.lock().await;
        let stop = state
            .stops
            .iter()
            .find(|stop| stop.id == stop_id && stop.is_day_active)?;

        let detail = StopDetail::new(stop, &self.config.image_base_path);
        state.detail = Some(detail.clone());
        Some(detail)
    }

    pub async fn close_stop_detail(&self) {
        self.state.lock().await.detail = None;
    }

    /// Reads the open stop's description aloud.
    pub async fn speak_stop_description(&self) {
        let mut state = self.state.lock().await;
        let text = state.detail.as_ref().and_then(|detail| {
            state
                .stops
                .iter()
                .find(|stop| stop.id == detail.stop_id)
                .and_then(Stop::readable_description)
                .map(str::to_owned)
        });

        if let Err(err) = state.speech.speak(text.as_deref()) {
            state.surface_speech_error(err);
        }
    }

    pub async fn stop_speaking(&self) {
        self.state.lock().await.speech.stop();
    }

    pub async fn speech_ended(&self, utterance: u64) {
        self.state.lock().await.speech.on_end(utterance);
    }

    pub async fn speech_failed(&self, utterance: u64, message: String) {
        let mut state = self.state.lock().await;
        if let Some(err) = state.speech.on_error(utterance, message) {
            state.surface_speech_error(err);
        }
    }

    pub async fn reset_speech_buttons(&self) {
        self.state.lock().await.speech.reset();
    }

    pub async fn show_alert(&self, message: String, severity: Severity) -> BannerId {
        self.state
            .lock()
            .await
            .notifications
            .show_alert(message, severity)
    }

    pub async fn dismiss_alert(&self, id: BannerId) -> bool {
        self.state.lock().await.notifications.dismiss(id)
    }

    pub async fn show_loading(&self) {
        self.state.lock().await.notifications.show_loading();
    }

    pub async fn hide_loading(&self) {
        self.state.lock().await.notifications.hide_loading();
    }

    /// Surfaces a failure nothing else caught, such as a panic in the host
    /// bindings.
    pub async fn report_unexpected_error(&self) {
        self.state.lock().await.notifications.show_alert(
            "An error occurred. Please refresh the page.",
            Severity::Danger,
        );
    }
}

#[cfg(test)]
mod tests;
