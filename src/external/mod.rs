pub mod nominatim;
pub mod routing;

#[cfg(test)]
pub(crate) mod fakes;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{BoundingBox, Coordinates, Route, RouteRequest};
use crate::error::Error;

/// Restricts a forward geocode to one country and to hits inside `bounds`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchScope {
    pub country_code: String,
    pub bounds: BoundingBox,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub scope: Option<SearchScope>,
}

impl SearchQuery {
    pub fn free(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            scope: None,
        }
    }

    pub fn scoped(text: impl Into<String>, scope: SearchScope) -> Self {
        Self {
            text: text.into(),
            scope: Some(scope),
        }
    }
}

/// A geocoder hit, normalized away from the provider's format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeocodedPlace {
    pub coordinates: Coordinates,
    pub display_name: String,
    pub region: Option<String>,
}

#[async_trait]
pub trait Geocoder {
    /// Forward search, best match first.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<GeocodedPlace>, Error>;

    /// Reverse search. `Ok(None)` when the provider knows nothing there.
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<GeocodedPlace>, Error>;
}

#[async_trait]
pub trait RoutingBackend {
    /// Candidate routes for the request. Never returns an empty list: zero
    /// routes is reported as an empty-result error.
    async fn fetch_routes(&self, request: &RouteRequest) -> Result<Vec<Route>, Error>;
}

pub type DynGeocoder = std::sync::Arc<dyn Geocoder + Send + Sync>;
pub type DynRoutingBackend = std::sync::Arc<dyn RoutingBackend + Send + Sync>;
