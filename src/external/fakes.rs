use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::entities::{Coordinates, Route, RouteRequest};
use crate::error::Error;
use crate::external::{GeocodedPlace, Geocoder, RoutingBackend, SearchQuery};

pub fn hit(lat: f64, lng: f64, display_name: &str, region: Option<&str>) -> GeocodedPlace {
    GeocodedPlace {
        coordinates: Coordinates::new(lat, lng),
        display_name: display_name.into(),
        region: region.map(Into::into),
    }
}

/// Answers searches from a script, then with no results.
#[derive(Default)]
pub struct FakeGeocoder {
    searches: Mutex<Vec<SearchQuery>>,
    search_results: Mutex<VecDeque<Result<Vec<GeocodedPlace>, Error>>>,
    reverse_result: Mutex<Option<Result<Option<GeocodedPlace>, Error>>>,
    reverse_calls: AtomicUsize,
}

impl FakeGeocoder {
    pub fn scripted(results: Vec<Result<Vec<GeocodedPlace>, Error>>) -> Self {
        Self {
            search_results: Mutex::new(results.into()),
            ..Self::default()
        }
    }

    pub fn with_reverse(self, result: Result<Option<GeocodedPlace>, Error>) -> Self {
        *self.reverse_result.lock().unwrap() = Some(result);
        self
    }

    pub fn searches(&self) -> Vec<SearchQuery> {
        self.searches.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.searches.lock().unwrap().len() + self.reverse_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<GeocodedPlace>, Error> {
        self.searches.lock().unwrap().push(query.clone());
        self.search_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn reverse(&self, _: Coordinates) -> Result<Option<GeocodedPlace>, Error> {
        self.reverse_calls.fetch_add(1, Ordering::SeqCst);
        self.reverse_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Ok(None))
    }
}

/// Holds the first request until released.
#[derive(Default)]
pub struct Gate {
    pub arrived: Notify,
    pub release: Notify,
    used: AtomicBool,
}

#[derive(Default)]
pub struct FakeRoutingBackend {
    requests: Mutex<Vec<RouteRequest>>,
    responses: Mutex<VecDeque<Result<Vec<Route>, Error>>>,
    gate: Option<Arc<Gate>>,
}

impl FakeRoutingBackend {
    pub fn scripted(responses: Vec<Result<Vec<Route>, Error>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    pub fn gated(mut self, gate: Arc<Gate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn requests(&self) -> Vec<RouteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RoutingBackend for FakeRoutingBackend {
    async fn fetch_routes(&self, request: &RouteRequest) -> Result<Vec<Route>, Error> {
        let response = {
            self.requests.lock().unwrap().push(request.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(crate::error::empty_result_error()))
        };

        if let Some(gate) = &self.gate {
            if !gate.used.swap(true, Ordering::SeqCst) {
                gate.arrived.notify_one();
                gate.release.notified().await;
            }
        }

        response
    }
}
