use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::NaiveDate;

use super::effect::{Effect, Keyboard, Reply};
use super::event::Event;
use super::session::SessionStore;
use super::transition::{transition, Transition};
use crate::deletion::{self, Deleted};
use crate::error::{EngineError, StoreError};
use crate::models::UserId;
use crate::report::{MonthlySeries, Summary};
use crate::store::TransactionStore;

/// Drives every user's conversation against one shared store.
pub(crate) struct ConversationEngine<S> {
    store: Mutex<S>,
    sessions: SessionStore,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// A turn whose effects stopped partway.
struct Failed {
    /// Whether something had already been written before the failure.
    wrote: bool,
    err: EngineError,
}

impl<S: TransactionStore> ConversationEngine<S> {
    pub(crate) fn new(store: S, idle_timeout: Duration) -> Self {
        Self::with_clock(store, idle_timeout, local_today)
    }

    pub(crate) fn with_clock(store: S, idle_timeout: Duration, today: fn() -> NaiveDate) -> Self {
        Self {
            store: Mutex::new(store),
            sessions: SessionStore::new(idle_timeout),
            today,
        }
    }

    /// Process one event for its user and return the messages to send back.
    ///
    /// Turns of the same user are serialized; turns of different users may
    /// run concurrently. On a store failure the session keeps its previous
    /// state unless something was already written.
    pub(crate) fn handle(&self, event: Event) -> Result<Vec<Reply>, EngineError> {
        let result = self.turn(event);
        let evicted = self.sessions.sweep(Instant::now());
        if evicted > 0 {
            tracing::debug!("swept {evicted} sessions");
        }
        result
    }

    fn turn(&self, event: Event) -> Result<Vec<Reply>, EngineError> {
        let now = Instant::now();
        let user = event.user();
        let handle = self.sessions.acquire(user)?;
        let mut session = handle.lock().map_err(|_| EngineError::Poisoned)?;

        let mut replies = Vec::new();
        if session.is_stale(now, self.sessions.idle_timeout()) {
            tracing::warn!("user {user}: {} session expired", session.state);
            session.state = Default::default();
            replies.push(Reply::new(
                "⌛ Your previous operation expired.",
                Keyboard::None,
            ));
        }

        let before = session.state.clone();
        let Transition { state, effects } = transition(before.clone(), &event, (self.today)());
        if !before.is_idle() && matches!(event, Event::Selection { .. }) {
            tracing::info!("user {user}: {before} abandoned by a selection");
        }

        let result = self.run_effects(user, effects, &mut replies);
        session.last_seen = Instant::now();
        match result {
            Ok(()) => {
                tracing::debug!("user {user}: {before} -> {state}");
                session.state = state;
                self.sessions.release(user, &handle, &session);
                Ok(replies)
            }
            Err(Failed { wrote, err }) => {
                tracing::warn!("user {user}: turn in {before} failed: {err}");
                if wrote {
                    session.state = state;
                }
                self.sessions.release(user, &handle, &session);
                Err(err)
            }
        }
    }

    fn run_effects(
        &self,
        user: UserId,
        effects: Vec<Effect>,
        replies: &mut Vec<Reply>,
    ) -> Result<(), Failed> {
        let mut store = self.store.lock().map_err(|_| Failed {
            wrote: false,
            err: EngineError::Poisoned,
        })?;
        let mut wrote = false;

        for effect in effects {
            let step = run_effect(&mut *store, user, effect, replies);
            match step {
                Ok(write) => wrote |= write,
                Err(err) => {
                    return Err(Failed {
                        wrote,
                        err: err.into(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Number of users with a conversation in progress.
    pub(crate) fn active_sessions(&self) -> usize {
        self.sessions.len()
    }
}

/// Run one effect. Returns whether it changed the store.
fn run_effect<S: TransactionStore + ?Sized>(
    store: &mut S,
    user: UserId,
    effect: Effect,
    replies: &mut Vec<Reply>,
) -> Result<bool, StoreError> {
    match effect {
        Effect::Reply(reply) => {
            replies.push(reply);
            Ok(false)
        }
        Effect::Persist(record) => {
            store.insert(&record)?;
            Ok(true)
        }
        Effect::PersistInstallments(plan) => {
            let group_id = uuid::Uuid::new_v4().to_string();
            store.insert_batch(&plan.expand(user, &group_id))?;
            Ok(true)
        }
        Effect::ShowSummary => {
            let summary = Summary::for_user(&*store, user)?;
            replies.push(Reply::menu(summary.render()));
            Ok(false)
        }
        Effect::ShowChart => {
            let series = MonthlySeries::for_user(&*store, user)?;
            replies.push(Reply::menu(series.render()));
            Ok(false)
        }
        Effect::OfferDeletion => {
            let candidates = deletion::list_candidates(&*store, user)?;
            if candidates.is_empty() {
                replies.push(Reply::menu("No records found to delete."));
            } else {
                replies.push(Reply::new(
                    "🗑️ Pick a record or an installment purchase to delete:",
                    Keyboard::Choices(candidates.choices()),
                ));
            }
            Ok(false)
        }
        Effect::Delete(selection) => match deletion::delete(store, user, &selection) {
            Ok(Deleted::Record) => {
                replies.push(Reply::menu("✅ Record deleted!"));
                Ok(true)
            }
            Ok(Deleted::Group { count }) => {
                replies.push(Reply::menu(format!(
                    "✅ All {count} installments of that purchase were deleted!"
                )));
                Ok(true)
            }
            Err(StoreError::NotFound) => {
                replies.push(Reply::menu("Nothing to delete: it no longer exists."));
                Ok(false)
            }
            Err(err) => Err(err),
        },
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
