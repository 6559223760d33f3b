use super::Engine;

use async_trait::async_trait;

use crate::{
    api::PlaceAPI,
    entities::{Coordinates, FieldInput, Place},
    error::Error,
};

#[async_trait]
impl PlaceAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn places(&self) -> Result<Vec<Place>, Error> {
        Ok(self.gazetteer.places().to_vec())
    }

    #[tracing::instrument(skip(self))]
    async fn nearest_place(&self, at: Coordinates) -> Result<Option<String>, Error> {
        Ok(self.gazetteer.nearest(at).map(String::from))
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_place(&self, input: &str) -> Result<Coordinates, Error> {
        self.resolver.resolve(input).await
    }

    #[tracing::instrument(skip(self))]
    async fn describe_position(&self, at: Coordinates) -> Result<FieldInput, Error> {
        let hit = match self.geocoder.reverse(at).await {
            Ok(hit) => hit,
            Err(err) => {
                tracing::warn!("reverse geocode failed: {}", err);
                None
            }
        };

        let known = hit.and_then(|hit| {
            self.gazetteer
                .lookup(&hit.display_name)
                .map(|_| hit.display_name)
        });

        Ok(match known {
            Some(name) => FieldInput::text(name),
            None => FieldInput::Position { coordinates: at },
        })
    }
}
