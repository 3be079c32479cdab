use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures_util::FutureExt;
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::map::LatLng;
use crate::routing::{RouteSegment, RoutingService, TravelMode};

/// Outcome of resolving a whole stop sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteSet {
    /// One segment per consecutive stop pair, road or fallback.
    Segments(Vec<RouteSegment>),
    /// A single straight-line path through every stop.
    DirectPath(RouteSegment),
}

impl RouteSet {
    pub fn into_segments(self) -> Vec<RouteSegment> {
        match self {
            RouteSet::Segments(segments) => segments,
            RouteSet::DirectPath(segment) => vec![segment],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RouteSet::Segments(segments) => segments.len(),
            RouteSet::DirectPath(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Receives segments as soon as each one is known, and tells the pipeline
/// when the job it belongs to has been replaced.
pub trait SegmentSink: Sync {
    fn is_current(&self) -> bool;

    /// Completes once the job is no longer current.
    fn superseded(&self) -> impl Future<Output = ()> + Send;

    fn accept(&self, segment: RouteSegment) -> impl Future<Output = ()> + Send;
}

/// Resolves stop pairs one after another, never more than one request in
/// flight, pausing `segment_delay` between requests.
pub struct RoutePipeline<R> {
    service: R,
    segment_delay: Duration,
    /// Held for a whole resolution; a new job waits for the previous one to
    /// wind down.
    lane: Mutex<()>,
}

impl<R: RoutingService> RoutePipeline<R> {
    pub fn new(service: R, segment_delay: Duration) -> Self {
        Self {
            service,
            segment_delay,
            lane: Mutex::new(()),
        }
    }

    pub fn service(&self) -> &R {
        &self.service
    }

    /// Never fails: unresolvable pairs become fallback segments, and a
    /// breakdown of the pipeline itself becomes one direct path.
    ///
    /// Each resolved segment is handed to `sink` right away. Once the sink
    /// reports the job superseded no further request is issued, the one in
    /// flight is dropped, and the segments resolved so far are returned.
    pub async fn resolve<K: SegmentSink>(
        &self,
        stops: &[LatLng],
        mode: TravelMode,
        sink: &K,
    ) -> RouteSet {
        if stops.len() < 2 {
            return RouteSet::Segments(Vec::new());
        }

        let _lane = self.lane.lock().await;
        if !sink.is_current() {
            return RouteSet::Segments(Vec::new());
        }

        match AssertUnwindSafe(self.resolve_segments(stops, mode, sink))
            .catch_unwind()
            .await
        {
            Ok(segments) => RouteSet::Segments(segments),
            Err(_) => {
                error!(stops = stops.len(), "route resolution aborted, drawing direct path");
                RouteSet::DirectPath(RouteSegment::direct_path(stops))
            }
        }
    }

    async fn resolve_segments<K: SegmentSink>(
        &self,
        stops: &[LatLng],
        mode: TravelMode,
        sink: &K,
    ) -> Vec<RouteSegment> {
        let mut segments = Vec::with_capacity(stops.len() - 1);

        for (index, pair) in stops.windows(2).enumerate() {
            if index > 0 && !self.segment_delay.is_zero() {
                tokio::select! {
                    biased;
                    () = sink.superseded() => break,
                    () = tokio::time::sleep(self.segment_delay) => {}
                }
            }

            let (from, to) = (pair[0], pair[1]);
            let outcome = tokio::select! {
                biased;
                () = sink.superseded() => break,
                outcome = self.service.route(from, to, mode) => outcome,
            };

            let segment = match outcome {
                Ok(path) => {
                    let segment = RouteSegment::road(index, path, mode);
                    debug!(
                        segment = index + 1,
                        distance_km = segment.distance_km,
                        duration_min = segment.duration_min,
                        "route segment resolved"
                    );
                    segment
                }
                Err(err) => {
                    warn!(segment = index + 1, %err, "road routing failed, using direct line");
                    RouteSegment::fallback(index, from, to)
                }
            };
            sink.accept(segment.clone()).await;
            segments.push(segment);
        }

        if segments.len() + 1 < stops.len() {
            debug!(resolved = segments.len(), "route job superseded, stopping");
        }
        segments
    }
}
