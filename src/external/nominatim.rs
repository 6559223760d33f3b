use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{BoundingBox, Coordinates},
    error::{invalid_input_error, transport_error, Error},
    external::{GeocodedPlace, Geocoder, SearchQuery},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Address {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

/// Nominatim answers with coordinates as strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Place {
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    pub address: Option<Address>,
}

impl Place {
    fn into_geocoded(self) -> Option<GeocodedPlace> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lng = self.lon.trim().parse::<f64>().ok()?;

        Some(GeocodedPlace {
            coordinates: Coordinates::new(lat, lng),
            display_name: self.display_name,
            region: self.address.and_then(|a| a.state),
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum ReverseResponse {
    Found(Place),
    Missing { error: String },
}

pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

/// `left,top,right,bottom` in lon/lat order.
fn viewbox(bounds: &BoundingBox) -> String {
    format!(
        "{},{},{},{}",
        bounds.west(),
        bounds.north(),
        bounds.east(),
        bounds.south()
    )
}

fn check_status(status: reqwest::StatusCode) -> Result<(), Error> {
    let code = status.as_u16();

    if (400..500).contains(&code) {
        return Err(invalid_input_error("geocoder rejected the query"));
    } else if code != 200 {
        return Err(transport_error(None));
    }

    Ok(())
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[tracing::instrument(skip(self))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<GeocodedPlace>, Error> {
        let url = format!("{}/search", self.base_url);

        let mut request = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, "en")
            .query(&[("format", "json"), ("limit", "1"), ("addressdetails", "1")])
            .query(&[("q", &query.text)]);

        // Nominatim rejects structured city/state/country filters next to `q`.
        if let Some(scope) = &query.scope {
            request = request.query(&[
                ("countrycodes", scope.country_code.clone()),
                ("viewbox", viewbox(&scope.bounds)),
                ("bounded", "1".to_string()),
            ]);
        }

        let res = request.send().await?;
        check_status(res.status())?;

        let data: Vec<Place> = res.json().await?;
        tracing::debug!("geocoder returned {} results", data.len());

        Ok(data.into_iter().filter_map(Place::into_geocoded).collect())
    }

    #[tracing::instrument(skip(self))]
    async fn reverse(&self, coordinates: Coordinates) -> Result<Option<GeocodedPlace>, Error> {
        let url = format!("{}/reverse", self.base_url);

        let res = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, "en")
            .query(&[("lat", coordinates.lat), ("lon", coordinates.lng)])
            .query(&[("format", "json"), ("addressdetails", "1")])
            .send()
            .await?;
        check_status(res.status())?;

        match res.json::<ReverseResponse>().await? {
            ReverseResponse::Found(place) => Ok(place.into_geocoded()),
            ReverseResponse::Missing { error } => {
                tracing::debug!("reverse geocode found nothing: {}", error);
                Ok(None)
            }
        }
    }
}
