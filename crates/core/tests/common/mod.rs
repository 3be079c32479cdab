//! In-process stand-in for the itinerary server and the OSRM service.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// How the fake routing service answers the n-th routing request.
#[derive(Clone, Copy, Debug)]
#[allow(dead_code)]
pub enum RouteFault {
    Unavailable,
    NoRoute,
    Garbage,
}

#[derive(Clone, Default)]
pub struct BackendState {
    pub stops: Arc<HashMap<i64, Value>>,
    pub malformed_itineraries: Arc<Vec<i64>>,
    pub route_faults: Arc<HashMap<usize, RouteFault>>,
    pub route_log: Arc<Mutex<Vec<String>>>,
}

pub struct FakeBackend {
    addr: SocketAddr,
    state: BackendState,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl FakeBackend {
    pub async fn start(state: BackendState) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let app = create_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// `{mode}/{coordinates}` of every routing request, in arrival order.
    #[allow(dead_code)]
    pub fn route_log(&self) -> Vec<String> {
        self.state.route_log.lock().unwrap().clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

fn create_router(state: BackendState) -> Router {
    Router::new()
        .route("/api/stops/{itinerary_id}", get(serve_stops))
        .route("/route/v1/{mode}/{coordinates}", get(serve_route))
        .with_state(state)
}

async fn serve_stops(State(state): State<BackendState>, Path(itinerary_id): Path<i64>) -> Response {
    if state.malformed_itineraries.contains(&itinerary_id) {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            "<html>oops</html>",
        )
            .into_response();
    }

    match state.stops.get(&itinerary_id) {
        Some(stops) => Json(stops.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve_route(
    State(state): State<BackendState>,
    Path((mode, coordinates)): Path<(String, String)>,
) -> Response {
    let ordinal = {
        let mut log = state.route_log.lock().unwrap();
        log.push(format!("{mode}/{coordinates}"));
        log.len() - 1
    };

    match state.route_faults.get(&ordinal) {
        Some(RouteFault::Unavailable) => return StatusCode::SERVICE_UNAVAILABLE.into_response(),
        Some(RouteFault::NoRoute) => {
            return Json(json!({"code": "NoRoute", "routes": []})).into_response();
        }
        Some(RouteFault::Garbage) => return "not json".into_response(),
        None => {}
    }

    let Some(((lng1, lat1), (lng2, lat2))) = parse_pair(&coordinates) else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    Json(json!({
        "code": "Ok",
        "routes": [{
            "distance": 12345.0,
            "duration": 1530.0,
            "geometry": {
                "type": "LineString",
                "coordinates": [
                    [lng1, lat1],
                    [(lng1 + lng2) / 2.0, (lat1 + lat2) / 2.0],
                    [lng2, lat2]
                ]
            }
        }],
        "waypoints": []
    }))
    .into_response()
}

fn parse_pair(coordinates: &str) -> Option<((f64, f64), (f64, f64))> {
    let (from, to) = coordinates.split_once(';')?;
    Some((parse_position(from)?, parse_position(to)?))
}

fn parse_position(position: &str) -> Option<(f64, f64)> {
    let (lng, lat) = position.split_once(',')?;
    Some((lng.parse().ok()?, lat.parse().ok()?))
}

pub fn stop_json(id: i64, day: u32, order: u32, lat: f64, lng: f64, active: bool) -> Value {
    json!({
        "id": id,
        "name": format!("Stop {id}"),
        "description": format!("About stop {id}."),
        "latitude": lat,
        "longitude": lng,
        "day_number": day,
        "is_day_active": active,
        "image_filename": null,
        "order_in_day": order
    })
}
