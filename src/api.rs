use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::entities::{
    ActiveField, Coordinates, FieldInput, Place, Route, RouteQuery, SessionSnapshot, TravelMode,
};
use crate::error::Error;

#[async_trait]
pub trait PlaceAPI {
    async fn places(&self) -> Result<Vec<Place>, Error>;

    async fn nearest_place(&self, at: Coordinates) -> Result<Option<String>, Error>;

    async fn resolve_place(&self, input: &str) -> Result<Coordinates, Error>;

    /// Field value for a trusted device position.
    async fn describe_position(&self, at: Coordinates) -> Result<FieldInput, Error>;
}

#[async_trait]
pub trait RouteAPI {
    async fn plan_routes(&self, query: RouteQuery) -> Result<Vec<Route>, Error>;
}

#[async_trait]
pub trait SessionAPI {
    async fn create_session(&self) -> Result<SessionSnapshot, Error>;

    async fn find_session(&self, id: Uuid) -> Result<SessionSnapshot, Error>;

    async fn delete_session(&self, id: Uuid) -> Result<(), Error>;

    async fn edit_field(
        &self,
        id: Uuid,
        field: ActiveField,
        input: FieldInput,
    ) -> Result<SessionSnapshot, Error>;

    async fn focus_field(&self, id: Uuid, field: ActiveField) -> Result<SessionSnapshot, Error>;

    async fn click_map(&self, id: Uuid, at: Coordinates) -> Result<SessionSnapshot, Error>;

    /// `None` when geolocation was denied or failed.
    async fn use_position(
        &self,
        id: Uuid,
        position: Option<Coordinates>,
    ) -> Result<SessionSnapshot, Error>;

    async fn update_preferences(
        &self,
        id: Uuid,
        travel_mode: Option<TravelMode>,
        departure: Option<NaiveDateTime>,
    ) -> Result<SessionSnapshot, Error>;

    async fn request_routes(&self, id: Uuid) -> Result<SessionSnapshot, Error>;

    async fn select_route(&self, id: Uuid, index: usize) -> Result<SessionSnapshot, Error>;
}

pub trait API: PlaceAPI + RouteAPI + SessionAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
