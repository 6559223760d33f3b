use super::Sessions;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::{
    entities::Session,
    error::{not_found_error, Error},
};

pub fn fetch_session<'a>(sessions: &'a mut Sessions, id: &Uuid) -> Result<&'a mut Session, Error> {
    let session = sessions.get_mut(id).ok_or_else(|| not_found_error("session"))?;
    session.touch(Utc::now());

    Ok(session)
}

/// Drops sessions unused for longer than `limit`, returning how many went.
pub fn prune_idle(sessions: &mut Sessions, now: DateTime<Utc>, limit: Duration) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| !session.is_idle(now, limit));

    before - sessions.len()
}
