mod helpers;
mod place_api;
mod route_api;
mod session_api;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    api::API,
    config::Config,
    entities::{ServiceArea, Session},
    error::Error,
    external::{
        nominatim::NominatimClient, routing::RoutingClient, DynGeocoder, DynRoutingBackend,
    },
    gazetteer::Gazetteer,
    resolver::Resolver,
};

type Sessions = HashMap<Uuid, Session>;

pub struct Engine {
    gazetteer: Arc<Gazetteer>,
    resolver: Resolver,
    geocoder: DynGeocoder,
    backend: DynRoutingBackend,
    sessions: Mutex<Sessions>,
    session_idle: chrono::Duration,
}

impl Engine {
    pub fn new(
        gazetteer: Gazetteer,
        geocoder: DynGeocoder,
        backend: DynRoutingBackend,
        area: ServiceArea,
    ) -> Self {
        let gazetteer = Arc::new(gazetteer);
        let resolver = Resolver::new(gazetteer.clone(), geocoder.clone(), area);

        Self {
            gazetteer,
            resolver,
            geocoder,
            backend,
            sessions: Mutex::new(HashMap::new()),
            session_idle: chrono::Duration::minutes(30),
        }
    }

    /// Sessions unused for longer than `idle` are dropped on the next create.
    pub fn with_session_idle(mut self, idle: Duration) -> Self {
        self.session_idle =
            chrono::Duration::from_std(idle).unwrap_or_else(|_| chrono::Duration::max_value());
        self
    }

    #[tracing::instrument(name = "Engine::from_config", skip_all)]
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let gazetteer = match &config.gazetteer_path {
            Some(path) => Gazetteer::from_json_file(path, config.nearest_threshold)?,
            None => Gazetteer::indore(config.nearest_threshold),
        };

        tracing::info!("loaded {} places", gazetteer.places().len());

        let geocoder = NominatimClient::new(
            config.geocoder_base_url.clone(),
            &config.geocoder_user_agent,
            config.http_timeout,
        )?;
        let backend = RoutingClient::new(config.routing_backend_url.clone(), config.http_timeout)?;

        Ok(Self::new(
            gazetteer,
            Arc::new(geocoder),
            Arc::new(backend),
            config.area.clone(),
        )
        .with_session_idle(config.session_idle))
    }
}

impl API for Engine {}
