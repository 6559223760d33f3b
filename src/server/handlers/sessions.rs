use axum::extract::{Extension, Json, Path};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::DynAPI;
use crate::entities::{
    parse_departure, ActiveField, Coordinates, FieldInput, SessionSnapshot, TravelMode,
};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct FieldParams {
    input: FieldInput,
}

#[derive(Serialize, Deserialize)]
pub struct FocusParams {
    field: ActiveField,
}

#[derive(Serialize, Deserialize)]
pub struct MapClickParams {
    lat: f64,
    lng: f64,
}

#[derive(Serialize, Deserialize)]
pub struct PositionParams {
    coordinates: Option<Coordinates>,
}

/// Raw picker values; `date` is `dd-mm-yyyy`, `time` is `h:mm AM`.
#[derive(Serialize, Deserialize)]
pub struct PreferenceParams {
    travel_mode: Option<TravelMode>,
    date: Option<String>,
    time: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct SelectParams {
    index: usize,
}

pub async fn create(Extension(api): Extension<DynAPI>) -> Result<Json<SessionSnapshot>, Error> {
    let session = api.create_session().await?;

    Ok(session.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, Error> {
    let session = api.find_session(id).await?;

    Ok(session.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Error> {
    api.delete_session(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn edit_field(
    Extension(api): Extension<DynAPI>,
    Path((id, field)): Path<(Uuid, ActiveField)>,
    Json(params): Json<FieldParams>,
) -> Result<Json<SessionSnapshot>, Error> {
    let session = api.edit_field(id, field, params.input).await?;

    Ok(session.into())
}

pub async fn focus(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<FocusParams>,
) -> Result<Json<SessionSnapshot>, Error> {
    let session = api.focus_field(id, params.field).await?;

    Ok(session.into())
}

pub async fn map_click(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<MapClickParams>,
) -> Result<Json<SessionSnapshot>, Error> {
    let at = Coordinates::new(params.lat, params.lng);
    let session = api.click_map(id, at).await?;

    Ok(session.into())
}

pub async fn position(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<PositionParams>,
) -> Result<Json<SessionSnapshot>, Error> {
    let session = api.use_position(id, params.coordinates).await?;

    Ok(session.into())
}

pub async fn preferences(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<PreferenceParams>,
) -> Result<Json<SessionSnapshot>, Error> {
    let departure = match (params.date.as_deref(), params.time.as_deref()) {
        (None, None) => None,
        (date, time) => Some(parse_departure(date, time)?),
    };

    let session = api
        .update_preferences(id, params.travel_mode, departure)
        .await?;

    Ok(session.into())
}

pub async fn request_routes(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, Error> {
    let session = api.request_routes(id).await?;

    Ok(session.into())
}

pub async fn select(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<SelectParams>,
) -> Result<Json<SessionSnapshot>, Error> {
    let session = api.select_route(id, params.index).await?;

    Ok(session.into())
}
