use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use super::state::Session;
use crate::error::EngineError;
use crate::models::UserId;

/// Live conversations keyed by user.
///
/// Each user gets their own lock, so one user's turns run strictly one after
/// another while other users are never blocked by them. Entries disappear as
/// soon as their flow ends, or after `idle_timeout` without input.
pub(crate) struct SessionStore {
    sessions: Mutex<HashMap<UserId, Arc<Mutex<Session>>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub(crate) fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub(crate) fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// The session of `user`, created idle if there is none.
    pub(crate) fn acquire(&self, user: UserId) -> Result<Arc<Mutex<Session>>, EngineError> {
        let mut sessions = self.sessions.lock().map_err(|_| EngineError::Poisoned)?;
        Ok(sessions
            .entry(user)
            .or_insert_with(|| Arc::new(Mutex::new(Session::new())))
            .clone())
    }

    /// Drop the entry of `user` once its flow is over.
    ///
    /// Must be called while still holding the lock of `handle`. The entry
    /// stays if another turn for the same user is already waiting on it.
    pub(crate) fn release(&self, user: UserId, handle: &Arc<Mutex<Session>>, session: &Session) {
        if !session.state.is_idle() {
            return;
        }
        let Ok(mut sessions) = self.sessions.lock() else {
            return;
        };
        let only_us = sessions
            .get(&user)
            .is_some_and(|entry| Arc::ptr_eq(entry, handle) && Arc::strong_count(handle) == 2);
        if only_us {
            sessions.remove(&user);
        }
    }

    /// Remove sessions that are idle or stale and not in use. Returns how many went.
    pub(crate) fn sweep(&self, now: Instant) -> usize {
        let Ok(mut sessions) = self.sessions.lock() else {
            return 0;
        };
        let before = sessions.len();
        sessions.retain(|user, entry| {
            if Arc::strong_count(entry) > 1 {
                return true;
            }
            let Ok(session) = entry.try_lock() else {
                return true;
            };
            let stale = session.is_stale(now, self.idle_timeout);
            if stale {
                tracing::warn!("evicting stale {} session of user {user}", session.state);
            }
            !(stale || session.state.is_idle())
        });
        before - sessions.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
