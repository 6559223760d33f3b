use super::Engine;

use async_trait::async_trait;

use crate::{
    api::RouteAPI,
    entities::{Coordinates, FieldInput, Route, RouteQuery, RouteRequest},
    error::Error,
};

impl Engine {
    /// Device positions are trusted as-is, text goes through the resolver.
    async fn locate(&self, input: &FieldInput) -> Result<Coordinates, Error> {
        match input {
            FieldInput::Position { coordinates } => Ok(*coordinates),
            FieldInput::Text { value } => self.resolver.resolve(value).await,
        }
    }
}

#[async_trait]
impl RouteAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn plan_routes(&self, query: RouteQuery) -> Result<Vec<Route>, Error> {
        let source = self.locate(&query.source).await?;
        let destination = self.locate(&query.destination).await?;

        let request = RouteRequest::new(source, destination, query.departure, query.travel_mode);

        self.backend.fetch_routes(&request).await
    }
}
