use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{ActiveField, FieldInput, Route, RouteQuery, RouteSelection, TravelMode};
use crate::error::{invalid_input_error, superseded_error, Error, UNRESOLVED_LOCATION};
use crate::render::RenderPlan;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum RequestStatus {
    Idle,
    Pending,
    Ready,
    Failed { message: String },
}

impl RequestStatus {
    pub fn name(&self) -> String {
        match self {
            Self::Idle => "idle".into(),
            Self::Pending => "pending".into(),
            Self::Ready => "ready".into(),
            Self::Failed { message: _ } => "failed".into(),
        }
    }
}

/// A route request that has left the session. Its result is only accepted if
/// `generation` is still current when it comes back.
#[derive(Clone, Debug)]
pub struct PendingRequest {
    pub generation: u64,
    pub query: RouteQuery,
}

/// UI state of one user: the two place fields, request preferences and the
/// route selection of the latest query.
#[derive(Clone, Debug)]
pub struct Session {
    pub id: Uuid,
    source: FieldInput,
    destination: FieldInput,
    active_field: ActiveField,
    travel_mode: TravelMode,
    departure: Option<NaiveDateTime>,
    selection: RouteSelection,
    status: RequestStatus,
    generation: u64,
    last_seen: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            source: FieldInput::default(),
            destination: FieldInput::default(),
            active_field: ActiveField::default(),
            travel_mode: TravelMode::default(),
            departure: None,
            selection: RouteSelection::default(),
            status: RequestStatus::Idle,
            generation: 0,
            last_seen: Utc::now(),
        }
    }

    pub fn field(&self, field: ActiveField) -> &FieldInput {
        match field {
            ActiveField::Source => &self.source,
            ActiveField::Destination => &self.destination,
        }
    }

    pub fn active_field(&self) -> ActiveField {
        self.active_field
    }

    pub fn selection(&self) -> &RouteSelection {
        &self.selection
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_seen = now;
    }

    /// True once the session has gone unused for longer than `limit`.
    pub fn is_idle(&self, now: DateTime<Utc>, limit: Duration) -> bool {
        now - self.last_seen > limit
    }

    pub fn focus(&mut self, field: ActiveField) {
        self.active_field = field;
    }

    /// Edits a field. Shown routes no longer match the inputs, so they are
    /// dropped and any request in flight is orphaned.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub fn set_field(&mut self, field: ActiveField, input: FieldInput) {
        match field {
            ActiveField::Source => self.source = input,
            ActiveField::Destination => self.destination = input,
        }
        self.invalidate();
    }

    /// Fills whichever field currently has focus.
    pub fn fill_active(&mut self, input: FieldInput) {
        self.set_field(self.active_field, input);
    }

    pub fn set_travel_mode(&mut self, travel_mode: TravelMode) {
        self.travel_mode = travel_mode;
    }

    pub fn set_departure(&mut self, departure: NaiveDateTime) {
        self.departure = Some(departure);
    }

    pub fn select(&mut self, index: usize) -> bool {
        self.selection.select(index)
    }

    /// Starts a new route request. The selection is emptied before anything
    /// is sent so no stale routes are shown while it is pending.
    #[tracing::instrument(skip(self), fields(session = %self.id))]
    pub fn begin_request(&mut self) -> Result<PendingRequest, Error> {
        if self.source.is_blank() || self.destination.is_blank() {
            return Err(invalid_input_error("Please enter both source and destination"));
        }

        self.invalidate();
        self.status = RequestStatus::Pending;

        Ok(PendingRequest {
            generation: self.generation,
            query: RouteQuery {
                source: self.source.clone(),
                destination: self.destination.clone(),
                departure: self.departure.unwrap_or_else(|| Local::now().naive_local()),
                travel_mode: self.travel_mode,
            },
        })
    }

    /// Applies the outcome of the request tagged `generation`. Outcomes of
    /// superseded requests are discarded without touching the session.
    #[tracing::instrument(skip(self, outcome), fields(session = %self.id))]
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: Result<Vec<Route>, Error>,
    ) -> Result<(), Error> {
        if generation != self.generation {
            tracing::info!(
                "discarding stale response {} (current {})",
                generation,
                self.generation
            );
            return Err(superseded_error());
        }

        match outcome {
            Ok(routes) => {
                tracing::info!("received {} routes", routes.len());
                self.selection.set_routes(routes);
                self.status = RequestStatus::Ready;
                Ok(())
            }
            Err(err) => {
                let message = if err.is(UNRESOLVED_LOCATION) {
                    format!("{}. Try selecting the place on the map.", err.message)
                } else {
                    err.message.clone()
                };
                self.status = RequestStatus::Failed { message };
                Err(err)
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let active = self.selection.active_index();

        SessionSnapshot {
            id: self.id,
            source: self.source.clone(),
            destination: self.destination.clone(),
            active_field: self.active_field,
            travel_mode: self.travel_mode,
            status: self.status.clone(),
            active_index: active,
            routes: self
                .selection
                .routes()
                .iter()
                .enumerate()
                .map(|(index, route)| RouteSummary::new(index, route, active == Some(index)))
                .collect(),
            render: RenderPlan::from_selection(&self.selection),
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
        self.selection.clear();
        self.status = RequestStatus::Idle;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// One row of the route list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub index: usize,
    pub route_name: String,
    pub total_distance_km: f64,
    pub total_time_min: f64,
    pub recommended: bool,
    pub badge: Option<String>,
    pub congestion_percent: u32,
    pub active: bool,
}

impl RouteSummary {
    fn new(index: usize, route: &Route, active: bool) -> Self {
        Self {
            index,
            route_name: route.route_name.clone(),
            total_distance_km: route.total_distance_km,
            total_time_min: route.total_time_min,
            recommended: route.recommended,
            badge: route.recommended.then(|| "Fastest".to_string()),
            congestion_percent: route.congestion_percentage(),
            active,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub source: FieldInput,
    pub destination: FieldInput,
    pub active_field: ActiveField,
    pub travel_mode: TravelMode,
    pub status: RequestStatus,
    pub active_index: Option<usize>,
    pub routes: Vec<RouteSummary>,
    pub render: Option<RenderPlan>,
}
