use std::collections::HashMap;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

use super::*;
use crate::error::RoutingError;
use crate::map::Viewport;
use crate::routing::PathGeometry;
use crate::speech::tests::RecordingEngine;

#[derive(Default)]
struct FakeSource {
    itineraries: HashMap<ItineraryId, Vec<Stop>>,
    gates: HashMap<ItineraryId, Arc<Notify>>,
}

impl StopSource for FakeSource {
    async fn fetch_stops(&self, itinerary: ItineraryId) -> Result<Vec<Stop>, FetchError> {
        if let Some(gate) = self.gates.get(&itinerary) {
            gate.notified().await;
        }
        self.itineraries
            .get(&itinerary)
            .cloned()
            .ok_or(FetchError::Status(404))
    }
}

#[derive(Default)]
struct FakeRouter {
    fail_all: AtomicBool,
    latency: Duration,
    panic_at: Option<usize>,
    modes: StdMutex<Vec<TravelMode>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Counts a request as in flight until it completes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl RoutingService for FakeRouter {
    async fn route(
        &self,
        from: LatLng,
        to: LatLng,
        mode: TravelMode,
    ) -> Result<PathGeometry, RoutingError> {
        let ordinal = {
            let mut modes = self.modes.lock().unwrap();
            modes.push(mode);
            modes.len() - 1
        };
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        let _in_flight = InFlight(&self.in_flight);

        if self.panic_at == Some(ordinal) {
            panic!("router crashed");
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(RoutingError::NoRoute);
        }
        Ok(PathGeometry {
            polyline: vec![from, to],
            distance_m: 2_500.0,
            duration_s: 300.0,
        })
    }
}

fn stop(id: i64, day: u32, order: u32, active: bool) -> Stop {
    Stop {
        id: StopId::new(id),
        itinerary_id: None,
        name: format!("Stop {id}"),
        description: Some(format!("About stop {id}.")),
        latitude: 31.5 + id as f64 * 0.01,
        longitude: 74.3 + id as f64 * 0.01,
        day_number: day,
        order_in_day: order,
        is_day_active: active,
        image_filename: None,
    }
}

fn lahore() -> ItineraryOption {
    ItineraryOption {
        id: ItineraryId::new(1),
        label: "Lahore Heritage Walk".to_owned(),
    }
}

fn hunza() -> ItineraryOption {
    ItineraryOption {
        id: ItineraryId::new(2),
        label: "Hunza Valley".to_owned(),
    }
}

fn source() -> FakeSource {
    let mut source = FakeSource::default();
    source.itineraries.insert(
        ItineraryId::new(1),
        vec![
            stop(1, 1, 1, false),
            stop(2, 1, 2, true),
            stop(3, 2, 1, false),
        ],
    );
    source.itineraries.insert(
        ItineraryId::new(2),
        vec![stop(10, 1, 1, true), stop(11, 1, 2, true)],
    );
    source.itineraries.insert(ItineraryId::new(3), vec![]);
    source.itineraries.insert(
        ItineraryId::new(4),
        (20..26)
            .map(|id| stop(id, 1 + (id as u32 - 20) / 3, 1 + (id as u32 - 20) % 3, true))
            .collect(),
    );
    source
}

fn karakoram() -> ItineraryOption {
    ItineraryOption {
        id: ItineraryId::new(4),
        label: "Karakoram Highway".to_owned(),
    }
}

/// Two seconds per routing request, 200 ms between requests.
fn slow_routing_view(router: FakeRouter) -> TestView {
    ItineraryView::new(
        Config {
            segment_delay: Duration::from_millis(200),
            ..Config::default()
        },
        source(),
        FakeRouter {
            latency: Duration::from_secs(2),
            ..router
        },
        Arc::new(RecordingEngine::default()),
    )
}

fn config() -> Config {
    Config {
        segment_delay: Duration::ZERO,
        loading_delay: Duration::ZERO,
        ..Config::default()
    }
}

type TestView = ItineraryView<FakeSource, FakeRouter>;

fn view_with(source: FakeSource) -> (TestView, Arc<RecordingEngine>) {
    let engine = Arc::new(RecordingEngine::default());
    let view = ItineraryView::new(config(), source, FakeRouter::default(), engine.clone());
    (view, engine)
}

fn view() -> (TestView, Arc<RecordingEngine>) {
    view_with(source())
}

fn messages(snapshot: &ViewSnapshot) -> Vec<(&str, Severity)> {
    snapshot
        .banners
        .iter()
        .map(|banner| (banner.message.as_str(), banner.severity))
        .collect()
}

#[tokio::test]
async fn test_selecting_itinerary_renders_markers_routes_and_panels() {
    let (view, _) = view();

    view.select_itinerary(Some(lahore())).await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.state, ViewState::Loaded(ItineraryId::new(1)));
    assert!(!snapshot.loading);
    assert_eq!(snapshot.scene.markers.len(), 3);
    assert_eq!(snapshot.scene.routes.len(), 2);
    assert!(snapshot.scene.routes.iter().all(|route| !route.is_fallback));
    assert!(matches!(snapshot.scene.viewport, Viewport::Bounds { .. }));
    assert_eq!(
        snapshot.panels.itinerary_info.as_deref(),
        Some("Selected: Lahore Heritage Walk")
    );
    assert_eq!(
        snapshot.panels.day_progress,
        Some(vec![
            DaySummary {
                day_number: 1,
                active: true,
                stop_count: 2
            },
            DaySummary {
                day_number: 2,
                active: false,
                stop_count: 1
            },
        ])
    );
    assert_eq!(
        messages(&snapshot),
        vec![("Itinerary loaded successfully!", Severity::Success)]
    );
}

#[tokio::test]
async fn test_routing_outage_still_draws_every_segment() {
    let (view, _) = view();
    view.pipeline.service().fail_all.store(true, Ordering::SeqCst);

    view.select_itinerary(Some(lahore())).await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.scene.markers.len(), 3);
    assert_eq!(snapshot.scene.routes.len(), 2);
    assert!(snapshot.scene.routes.iter().all(|route| route.is_fallback));
    assert_eq!(snapshot.state, ViewState::Loaded(ItineraryId::new(1)));
}

#[tokio::test]
async fn test_marker_interactivity_follows_active_day() {
    let (view, _) = view();
    view.select_itinerary(Some(lahore())).await;

    let snapshot = view.snapshot().await;
    let interactive: Vec<bool> = snapshot
        .scene
        .markers
        .iter()
        .filter_map(Overlay::as_stop)
        .map(|marker| marker.is_interactive())
        .collect();
    assert_eq!(interactive, vec![false, true, false]);
}

#[tokio::test]
async fn test_empty_selection_clears_everything() {
    let (view, _) = view();
    view.select_itinerary(Some(lahore())).await;

    view.select_itinerary(None).await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.state, ViewState::NoSelection);
    assert!(snapshot.scene.markers.is_empty());
    assert!(snapshot.scene.routes.is_empty());
    assert_eq!(snapshot.panels, Panels::default());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_render() {
    let (view, _) = view();
    view.select_itinerary(Some(lahore())).await;

    view.select_itinerary(Some(ItineraryOption {
        id: ItineraryId::new(99),
        label: "Missing".to_owned(),
    }))
    .await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.state, ViewState::Error(ItineraryId::new(99)));
    assert!(!snapshot.loading);
    assert_eq!(snapshot.scene.markers.len(), 3);
    assert_eq!(snapshot.scene.routes.len(), 2);
    assert_eq!(
        messages(&snapshot).last(),
        Some(&("Error loading itinerary. Please try again.", Severity::Danger))
    );
}

#[tokio::test]
async fn test_itinerary_without_stops() {
    let (view, _) = view();
    view.select_itinerary(Some(lahore())).await;

    view.select_itinerary(Some(ItineraryOption {
        id: ItineraryId::new(3),
        label: "Empty".to_owned(),
    }))
    .await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.state, ViewState::Loaded(ItineraryId::new(3)));
    assert!(snapshot.scene.markers.is_empty());
    assert!(snapshot.scene.routes.is_empty());
    assert_eq!(snapshot.panels.day_progress, None);
    assert_eq!(
        snapshot.panels.itinerary_info.as_deref(),
        Some("Selected: Empty")
    );
    assert!(messages(&snapshot).contains(&("No stops found for this itinerary", Severity::Warning)));
}

#[tokio::test]
async fn test_single_stop_has_no_route() {
    let mut source = source();
    source
        .itineraries
        .insert(ItineraryId::new(4), vec![stop(20, 1, 1, true)]);
    let (view, _) = view_with(source);

    view.select_itinerary(Some(ItineraryOption {
        id: ItineraryId::new(4),
        label: "One".to_owned(),
    }))
    .await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.scene.markers.len(), 1);
    assert!(snapshot.scene.routes.is_empty());
    assert!(view.pipeline.service().modes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_stale_stop_response_is_discarded() {
    let gate = Arc::new(Notify::new());
    let mut source = source();
    source.gates.insert(ItineraryId::new(1), gate.clone());
    let (view, _) = view_with(source);

    // The slow first selection resolves only after the second has rendered.
    tokio::join!(view.select_itinerary(Some(lahore())), async {
        view.select_itinerary(Some(hunza())).await;
        gate.notify_one();
    });
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.state, ViewState::Loaded(ItineraryId::new(2)));
    assert!(!snapshot.loading);
    let stop_ids: Vec<StopId> = snapshot
        .scene
        .markers
        .iter()
        .filter_map(Overlay::as_stop)
        .map(|marker| marker.stop_id)
        .collect();
    assert_eq!(stop_ids, vec![StopId::new(10), StopId::new(11)]);
    assert_eq!(snapshot.scene.routes.len(), 1);
    assert_eq!(
        snapshot.panels.itinerary_info.as_deref(),
        Some("Selected: Hunza Valley")
    );
    assert_eq!(
        messages(&snapshot)
            .iter()
            .filter(|(_, severity)| *severity == Severity::Success)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_route_mode_change_rebuilds_routes_only() {
    let (view, _) = view();
    view.select_itinerary(Some(lahore())).await;
    let before = view.snapshot().await;

    view.change_route_mode(TravelMode::Walking).await;
    let after = view.snapshot().await;

    assert_eq!(after.route_mode, TravelMode::Walking);
    assert_eq!(after.scene.markers, before.scene.markers);
    assert_eq!(after.scene.routes.len(), 2);
    assert!(
        after.scene.routes[0]
            .popup
            .lines
            .contains(&"Walking route".to_owned())
    );
    assert!(messages(&after).contains(&("Updating routes...", Severity::Info)));

    let modes = view.pipeline.service().modes.lock().unwrap().clone();
    assert_eq!(
        modes,
        vec![
            TravelMode::Driving,
            TravelMode::Driving,
            TravelMode::Walking,
            TravelMode::Walking
        ]
    );
}

#[tokio::test]
async fn test_route_mode_change_without_itinerary_only_records_mode() {
    let (view, _) = view();

    view.change_route_mode(TravelMode::Walking).await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.route_mode, TravelMode::Walking);
    assert!(snapshot.banners.is_empty());
    assert!(view.pipeline.service().modes.lock().unwrap().is_empty());

    view.select_itinerary(Some(hunza())).await;
    assert_eq!(
        *view.pipeline.service().modes.lock().unwrap(),
        vec![TravelMode::Walking]
    );
}

#[tokio::test]
async fn test_base_layer_switch() {
    let (view, _) = view();
    view.change_base_layer(BaseLayer::Topo).await;
    view.change_base_layer(BaseLayer::Satellite).await;

    assert_eq!(view.snapshot().await.scene.base_layer, BaseLayer::Satellite);
}

#[tokio::test]
async fn test_stop_detail_only_for_active_stops() {
    let (view, _) = view();
    view.select_itinerary(Some(lahore())).await;

    assert_eq!(view.open_stop_detail(StopId::new(1)).await, None);

    let detail = view.open_stop_detail(StopId::new(2)).await.unwrap();
    assert_eq!(detail.title, "Stop 2");
    assert_eq!(detail.day_badge, "Day 1");
    assert_eq!(detail.image, StopImage::Placeholder);
    assert_eq!(view.snapshot().await.detail, Some(detail));

    view.close_stop_detail().await;
    assert_eq!(view.snapshot().await.detail, None);
}

#[tokio::test]
async fn test_speaking_without_description_warns_and_stays_idle() {
    let mut source = source();
    source.itineraries.get_mut(&ItineraryId::new(2)).unwrap()[0].description = None;
    let (view, engine) = view_with(source);
    view.select_itinerary(Some(hunza())).await;
    view.open_stop_detail(StopId::new(10)).await.unwrap();

    view.speak_stop_description().await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.speech_state, SpeechState::Idle);
    assert!(engine.spoken.lock().unwrap().is_empty());
    assert!(messages(&snapshot).contains(&("No description available to read", Severity::Warning)));
}

#[tokio::test]
async fn test_speech_round_trip() {
    let (view, engine) = view();
    view.select_itinerary(Some(hunza())).await;
    view.open_stop_detail(StopId::new(11)).await.unwrap();

    view.speak_stop_description().await;
    let snapshot = view.snapshot().await;
    let utterance = engine.spoken.lock().unwrap()[0].clone();
    assert_eq!(utterance.text, "About stop 11.");
    assert_eq!(
        snapshot.speech_state,
        SpeechState::Speaking {
            utterance: utterance.id
        }
    );
    assert!(snapshot.speech.stop_visible);

    view.speech_failed(utterance.id, "interrupted".to_owned()).await;
    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.speech_state, SpeechState::Idle);
    assert!(snapshot.speech.speak_visible);
    assert!(messages(&snapshot).contains(&("Error playing audio. Please try again.", Severity::Danger)));
}

struct FixedLocation(Result<LatLng, GeolocationError>, bool);

impl Geolocator for FixedLocation {
    fn is_supported(&self) -> bool {
        self.1
    }

    async fn current_position(
        &self,
        request: LocateRequest,
    ) -> Result<LatLng, GeolocationError> {
        assert!(request.high_accuracy);
        assert_eq!(request.timeout, Duration::from_secs(10));
        self.0
    }
}

#[tokio::test]
async fn test_locate_user_adds_marker_and_centers() {
    let (view, _) = view();
    view.select_itinerary(Some(hunza())).await;

    let here = LatLng::new(36.316, 74.65);
    view.locate_user(&FixedLocation(Ok(here), true)).await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.scene.markers.len(), 3);
    assert!(matches!(
        snapshot.scene.markers.last(),
        Some(Overlay::UserLocation(marker)) if marker.position == here
    ));
    assert_eq!(
        snapshot.scene.viewport,
        Viewport::Center {
            center: here,
            zoom: 15
        }
    );
    assert!(!snapshot.loading);
    assert!(messages(&snapshot).contains(&("Location found!", Severity::Success)));
}

#[tokio::test]
async fn test_locate_user_failures() {
    let (view, _) = view();

    view.locate_user(&FixedLocation(Err(GeolocationError::PermissionDenied), true))
        .await;
    view.locate_user(&FixedLocation(Ok(LatLng::new(0.0, 0.0)), false))
        .await;
    let snapshot = view.snapshot().await;

    assert!(snapshot.scene.markers.is_empty());
    assert!(!snapshot.loading);
    assert_eq!(
        messages(&snapshot),
        vec![
            (
                "Unable to get your location. Location access denied.",
                Severity::Warning
            ),
            (
                "Geolocation is not supported by this browser.",
                Severity::Warning
            ),
        ]
    );
}

#[tokio::test]
async fn test_reset_view_without_stops_returns_to_default() {
    let (view, _) = view();
    view.begin_locate(true).await;
    view.finish_locate(Ok(LatLng::new(36.0, 74.0))).await;

    view.reset_view().await;
    let snapshot = view.snapshot().await;

    assert_eq!(
        snapshot.scene.viewport,
        Viewport::Center {
            center: LatLng::new(40.7128, -74.0060),
            zoom: 10
        }
    );
    assert!(messages(&snapshot).contains(&("Map view reset", Severity::Info)));
}

#[tokio::test]
async fn test_reset_view_redraws_stops() {
    let (view, _) = view();
    view.select_itinerary(Some(lahore())).await;
    view.begin_locate(true).await;
    view.finish_locate(Ok(LatLng::new(36.0, 74.0))).await;

    view.reset_view().await;
    let snapshot = view.snapshot().await;

    assert_eq!(snapshot.scene.markers.len(), 3);
    assert!(
        snapshot
            .scene
            .markers
            .iter()
            .all(|marker| marker.as_stop().is_some())
    );
    assert_eq!(snapshot.scene.routes.len(), 2);
    assert!(matches!(snapshot.scene.viewport, Viewport::Bounds { .. }));
}

#[tokio::test(start_paused = true)]
async fn test_loading_overlay_outlives_render_by_loading_delay() {
    let engine = Arc::new(RecordingEngine::default());
    let view = ItineraryView::new(
        Config {
            segment_delay: Duration::ZERO,
            ..Config::default()
        },
        source(),
        FakeRouter::default(),
        engine,
    );

    tokio::join!(view.select_itinerary(Some(hunza())), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let snapshot = view.snapshot().await;
        assert!(snapshot.loading);
        assert_eq!(snapshot.scene.markers.len(), 2);

        tokio::time::sleep(Duration::from_millis(450)).await;
        assert!(!view.snapshot().await.loading);
    });
}

#[tokio::test]
async fn test_facade_alerts_and_loading() {
    let (view, _) = view();

    let id = view
        .show_alert("Saved".to_owned(), Severity::Success)
        .await;
    view.show_loading().await;
    assert!(view.snapshot().await.loading);
    view.hide_loading().await;

    assert!(view.dismiss_alert(id).await);
    let snapshot = view.snapshot().await;
    assert!(snapshot.banners.is_empty());
    assert!(!snapshot.loading);
}

#[tokio::test(start_paused = true)]
async fn test_loading_clears_while_routes_are_still_resolving() {
    let view = slow_routing_view(FakeRouter::default());

    tokio::join!(view.select_itinerary(Some(karakoram())), async {
        tokio::time::sleep(Duration::from_millis(600)).await;
        let snapshot = view.snapshot().await;
        assert!(!snapshot.loading);
        assert_eq!(snapshot.scene.markers.len(), 6);
        assert!(snapshot.scene.routes.is_empty());
        assert!(
            messages(&snapshot).contains(&("Itinerary loaded successfully!", Severity::Success))
        );

        // Requests finish at 2.0 s, 4.2 s, 6.4 s and so on.
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(view.snapshot().await.scene.routes.len(), 1);
        tokio::time::sleep(Duration::from_millis(2_200)).await;
        assert_eq!(view.snapshot().await.scene.routes.len(), 2);
    });

    assert_eq!(view.snapshot().await.scene.routes.len(), 5);
}

#[tokio::test(start_paused = true)]
async fn test_route_mode_change_stops_the_previous_pass() {
    let view = slow_routing_view(FakeRouter::default());

    tokio::join!(view.select_itinerary(Some(karakoram())), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        view.change_route_mode(TravelMode::Walking).await;
    });

    let router = view.pipeline.service();
    assert_eq!(
        *router.modes.lock().unwrap(),
        [vec![TravelMode::Driving], vec![TravelMode::Walking; 5]].concat()
    );
    assert_eq!(router.max_in_flight.load(Ordering::SeqCst), 1);

    let snapshot = view.snapshot().await;
    assert_eq!(snapshot.scene.routes.len(), 5);
    assert!(
        snapshot
            .scene
            .routes
            .iter()
            .all(|route| route.popup.lines.contains(&"Walking route".to_owned()))
    );
}

#[tokio::test]
async fn test_route_breakdown_replaces_drawn_segments_with_direct_path() {
    let view = ItineraryView::new(
        config(),
        source(),
        FakeRouter {
            panic_at: Some(2),
            ..FakeRouter::default()
        },
        Arc::new(RecordingEngine::default()),
    );

    view.select_itinerary(Some(karakoram())).await;
    let routes = view.snapshot().await.scene.routes;

    assert_eq!(routes.len(), 1);
    assert!(routes[0].is_fallback);
    assert_eq!(routes[0].popup.title, "Direct Path Route");
    assert_eq!(routes[0].polyline.len(), 6);
}

#[tokio::test]
async fn test_location_result_without_request_is_ignored() {
    let (view, _) = view();
    view.show_loading().await;

    view.finish_locate(Ok(LatLng::new(36.0, 74.0))).await;
    let snapshot = view.snapshot().await;
    assert!(snapshot.loading);
    assert!(snapshot.scene.markers.is_empty());
    assert!(snapshot.banners.is_empty());

    view.begin_locate(true).await;
    view.finish_locate(Err(GeolocationError::Timeout)).await;
    view.finish_locate(Ok(LatLng::new(36.0, 74.0))).await;
    let snapshot = view.snapshot().await;
    assert!(!snapshot.loading);
    assert!(snapshot.scene.markers.is_empty());
    assert_eq!(snapshot.banners.len(), 1);
    assert_eq!(snapshot.banners[0].severity, Severity::Warning);
}

#[tokio::test]
async fn test_unexpected_error_banner() {
    let (view, _) = view();

    view.report_unexpected_error().await;

    assert_eq!(
        messages(&view.snapshot().await),
        vec![("An error occurred. Please refresh the page.", Severity::Danger)]
    );
}
