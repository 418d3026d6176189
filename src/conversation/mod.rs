//! The guided chat flows: states, events, the pure transition function and
//! the engine that runs it per user against the store.

mod effect;
mod engine;
mod event;
mod session;
mod state;
mod transition;

pub(crate) use effect::{Keyboard, Reply};
pub(crate) use engine::ConversationEngine;
pub(crate) use event::{Event, MenuAction, CANCEL_LABEL};
