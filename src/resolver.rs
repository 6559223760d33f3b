use std::sync::Arc;

use crate::entities::{Coordinates, ServiceArea};
use crate::error::{
    out_of_bounds_error, unresolved_location_error, Error, OUT_OF_BOUNDS, TRANSPORT_FAILURE,
};
use crate::external::{DynGeocoder, GeocodedPlace, SearchQuery, SearchScope};
use crate::gazetteer::Gazetteer;

/// One way of turning text into coordinates. The resolver tries them in
/// `CHAIN` order and stops at the first one that produces a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// `"<lat>,<lng>"`; authoritative, so out of area input fails outright.
    Literal,
    Exact,
    Substring,
    /// Text that looks like a reverse geocoded postal address.
    Address,
    ScopedGeocode,
    UnscopedGeocode,
}

impl Strategy {
    pub const CHAIN: [Strategy; 6] = [
        Strategy::Literal,
        Strategy::Exact,
        Strategy::Substring,
        Strategy::Address,
        Strategy::ScopedGeocode,
        Strategy::UnscopedGeocode,
    ];
}

#[derive(Clone)]
pub struct Resolver {
    gazetteer: Arc<Gazetteer>,
    geocoder: DynGeocoder,
    area: ServiceArea,
}

impl Resolver {
    pub fn new(gazetteer: Arc<Gazetteer>, geocoder: DynGeocoder, area: ServiceArea) -> Self {
        Self {
            gazetteer,
            geocoder,
            area,
        }
    }

    /// Resolves user text to coordinates inside the service area.
    ///
    /// Geocoder failures count as "no match" and the chain moves on, except
    /// in the last stage where a transport failure is reported as such.
    #[tracing::instrument(skip(self))]
    pub async fn resolve(&self, input: &str) -> Result<Coordinates, Error> {
        if input.trim().is_empty() {
            return Err(unresolved_location_error(input));
        }

        let last = Strategy::CHAIN.len() - 1;

        for (stage, strategy) in Strategy::CHAIN.iter().enumerate() {
            match self.attempt(*strategy, input).await {
                Ok(Some(coordinates)) => {
                    tracing::info!("resolved via {:?} to {}", strategy, coordinates);
                    return Ok(coordinates);
                }
                Ok(None) => {}
                Err(err) if err.is(OUT_OF_BOUNDS) => return Err(err),
                Err(err) if stage == last && err.is(TRANSPORT_FAILURE) => return Err(err),
                Err(err) => {
                    tracing::warn!("{:?} stage failed, moving on: {}", strategy, err);
                }
            }
        }

        Err(unresolved_location_error(input))
    }

    /// Runs a single stage. `Ok(None)` means the stage did not match.
    pub async fn attempt(
        &self,
        strategy: Strategy,
        input: &str,
    ) -> Result<Option<Coordinates>, Error> {
        let trimmed = input.trim();

        match strategy {
            Strategy::Literal => match Coordinates::parse_literal(trimmed) {
                Some(coordinates) if self.area.contains(&coordinates) => Ok(Some(coordinates)),
                Some(_) => Err(out_of_bounds_error(trimmed)),
                None => Ok(None),
            },
            Strategy::Exact => Ok(self.gazetteer.lookup(trimmed)),
            Strategy::Substring => Ok(self.gazetteer.find_in(input).map(|p| p.coordinates)),
            Strategy::Address => {
                if !self.area.looks_like_address(trimmed) {
                    return Ok(None);
                }

                let hits = self.geocoder.search(&SearchQuery::free(trimmed)).await?;

                Ok(hits
                    .into_iter()
                    .next()
                    .map(|hit| hit.coordinates)
                    .filter(|coordinates| self.area.contains(coordinates)))
            }
            Strategy::ScopedGeocode => {
                self.geocode(SearchQuery::scoped(trimmed, self.scope()))
                    .await
            }
            Strategy::UnscopedGeocode => {
                let text = format!("{}, {}", trimmed, self.area.city);
                self.geocode(SearchQuery::free(text)).await
            }
        }
    }

    async fn geocode(&self, query: SearchQuery) -> Result<Option<Coordinates>, Error> {
        let hits = self.geocoder.search(&query).await?;

        Ok(hits
            .into_iter()
            .next()
            .filter(|hit| self.accepts(hit))
            .map(|hit| hit.coordinates))
    }

    fn accepts(&self, hit: &GeocodedPlace) -> bool {
        let in_region = hit
            .region
            .as_deref()
            .map_or(false, |region| self.area.matches_region(region));

        in_region
            || self.area.mentions_city(&hit.display_name)
            || self.area.contains(&hit.coordinates)
    }

    fn scope(&self) -> SearchScope {
        SearchScope {
            country_code: self.area.country_code.clone(),
            bounds: self.area.bounds,
        }
    }
}
