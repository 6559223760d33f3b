use super::helpers::{fetch_session, prune_idle};
use super::Engine;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{
    api::{PlaceAPI, RouteAPI, SessionAPI},
    entities::{ActiveField, Coordinates, FieldInput, Session, SessionSnapshot, TravelMode},
    error::{invalid_input_error, not_found_error, Error},
};

#[async_trait]
impl SessionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_session(&self) -> Result<SessionSnapshot, Error> {
        let session = Session::new();
        let snapshot = session.snapshot();

        let mut sessions = self.sessions.lock().await;

        let pruned = prune_idle(&mut sessions, Utc::now(), self.session_idle);
        if pruned > 0 {
            tracing::info!("dropped {} idle sessions", pruned);
        }

        sessions.insert(session.id, session);

        tracing::info!("created session {}", snapshot.id);

        Ok(snapshot)
    }

    #[tracing::instrument(skip(self))]
    async fn find_session(&self, id: Uuid) -> Result<SessionSnapshot, Error> {
        let mut sessions = self.sessions.lock().await;

        Ok(fetch_session(&mut sessions, &id)?.snapshot())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_session(&self, id: Uuid) -> Result<(), Error> {
        self.sessions
            .lock()
            .await
            .remove(&id)
            .ok_or_else(|| not_found_error("session"))?;

        tracing::info!("deleted session {}", id);

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn edit_field(
        &self,
        id: Uuid,
        field: ActiveField,
        input: FieldInput,
    ) -> Result<SessionSnapshot, Error> {
        let mut sessions = self.sessions.lock().await;
        let session = fetch_session(&mut sessions, &id)?;

        session.set_field(field, input);

        Ok(session.snapshot())
    }

    #[tracing::instrument(skip(self))]
    async fn focus_field(&self, id: Uuid, field: ActiveField) -> Result<SessionSnapshot, Error> {
        let mut sessions = self.sessions.lock().await;
        let session = fetch_session(&mut sessions, &id)?;

        session.focus(field);

        Ok(session.snapshot())
    }

    #[tracing::instrument(skip(self))]
    async fn click_map(&self, id: Uuid, at: Coordinates) -> Result<SessionSnapshot, Error> {
        let name = self.nearest_place(at).await?;

        let mut sessions = self.sessions.lock().await;
        let session = fetch_session(&mut sessions, &id)?;

        match name {
            Some(name) => session.fill_active(FieldInput::text(name)),
            None => tracing::debug!("no known place near {}", at),
        }

        Ok(session.snapshot())
    }

    #[tracing::instrument(skip(self))]
    async fn use_position(
        &self,
        id: Uuid,
        position: Option<Coordinates>,
    ) -> Result<SessionSnapshot, Error> {
        let input = match position {
            Some(at) => Some(self.describe_position(at).await?),
            None => {
                tracing::info!("geolocation unavailable, leaving fields as they are");
                None
            }
        };

        let mut sessions = self.sessions.lock().await;
        let session = fetch_session(&mut sessions, &id)?;

        if let Some(input) = input {
            session.fill_active(input);
        }

        Ok(session.snapshot())
    }

    #[tracing::instrument(skip(self))]
    async fn update_preferences(
        &self,
        id: Uuid,
        travel_mode: Option<TravelMode>,
        departure: Option<NaiveDateTime>,
    ) -> Result<SessionSnapshot, Error> {
        let mut sessions = self.sessions.lock().await;
        let session = fetch_session(&mut sessions, &id)?;

        if let Some(travel_mode) = travel_mode {
            session.set_travel_mode(travel_mode);
        }
        if let Some(departure) = departure {
            session.set_departure(departure);
        }

        Ok(session.snapshot())
    }

    /// The session lock is released while places are resolved and the
    /// backend is queried; the outcome is applied only if no newer request or
    /// field edit happened meanwhile.
    #[tracing::instrument(skip(self))]
    async fn request_routes(&self, id: Uuid) -> Result<SessionSnapshot, Error> {
        let pending = {
            let mut sessions = self.sessions.lock().await;
            fetch_session(&mut sessions, &id)?.begin_request()?
        };

        let outcome = self.plan_routes(pending.query).await;

        let mut sessions = self.sessions.lock().await;
        let session = fetch_session(&mut sessions, &id)?;

        let applied = session.complete(pending.generation, outcome);
        tracing::info!("session {} is {}", id, session.status().name());
        applied?;

        Ok(session.snapshot())
    }

    #[tracing::instrument(skip(self))]
    async fn select_route(&self, id: Uuid, index: usize) -> Result<SessionSnapshot, Error> {
        let mut sessions = self.sessions.lock().await;
        let session = fetch_session(&mut sessions, &id)?;

        if !session.select(index) {
            return Err(invalid_input_error(format!("no route at index {}", index)));
        }

        Ok(session.snapshot())
    }
}
