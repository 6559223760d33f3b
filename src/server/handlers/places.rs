use axum::extract::{Extension, Json, Query};
use serde::{Deserialize, Serialize};

use crate::api::DynAPI;
use crate::entities::{Coordinates, FieldInput, Place};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct PositionParams {
    lat: f64,
    lng: f64,
}

impl From<PositionParams> for Coordinates {
    fn from(params: PositionParams) -> Self {
        Coordinates::new(params.lat, params.lng)
    }
}

#[derive(Serialize, Deserialize)]
pub struct NearestResponse {
    name: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ResolveParams {
    input: String,
}

pub async fn list(Extension(api): Extension<DynAPI>) -> Result<Json<Vec<Place>>, Error> {
    let places = api.places().await?;

    Ok(places.into())
}

pub async fn nearest(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<PositionParams>,
) -> Result<Json<NearestResponse>, Error> {
    let name = api.nearest_place(params.into()).await?;

    Ok(NearestResponse { name }.into())
}

pub async fn resolve(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<ResolveParams>,
) -> Result<Json<Coordinates>, Error> {
    let coordinates = api.resolve_place(&params.input).await?;

    Ok(coordinates.into())
}

pub async fn describe(
    Extension(api): Extension<DynAPI>,
    Query(params): Query<PositionParams>,
) -> Result<Json<FieldInput>, Error> {
    let input = api.describe_position(params.into()).await?;

    Ok(input.into())
}
