use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    entities::{Route, RouteRequest},
    error::{empty_result_error, transport_error, Error},
    external::RoutingBackend,
};

#[derive(Deserialize)]
struct BackendError {
    error: Option<String>,
}

/// Client for the traffic prediction service's `POST /api/routes/`.
pub struct RoutingClient {
    client: Client,
    base_url: String,
}

impl RoutingClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RoutingBackend for RoutingClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_routes(&self, request: &RouteRequest) -> Result<Vec<Route>, Error> {
        let url = format!("{}/api/routes/", self.base_url);

        let res = self.client.post(url).json(request).send().await?;

        if !res.status().is_success() {
            let status = res.status();
            let message = res
                .json::<BackendError>()
                .await
                .ok()
                .and_then(|body| body.error)
                .filter(|message| !message.is_empty());

            tracing::warn!("routing backend answered {}: {:?}", status, message);

            return Err(transport_error(Some(
                message.unwrap_or_else(|| "Error fetching route".into()),
            )));
        }

        let routes: Vec<Route> = res.json().await.map_err(|err| {
            tracing::warn!("undecodable routing response: {}", err);
            transport_error(Some("invalid response from routing backend".into()))
        })?;

        if routes.is_empty() {
            return Err(empty_result_error());
        }

        tracing::info!("routing backend returned {} routes", routes.len());

        Ok(routes)
    }
}
