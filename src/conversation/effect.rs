use crate::deletion::{Choice, Selection};
use crate::models::{InstallmentPlan, NewTransaction};

/// Buttons sent along with a reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum Keyboard {
    #[default]
    None,
    /// The main menu.
    Menu,
    /// A single cancel button, shown while a flow is active.
    Cancel,
    /// Inline options; clicking one sends back its id as a selection event.
    Choices(Vec<Choice>),
}

/// One outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Reply {
    pub(crate) text: String,
    pub(crate) keyboard: Keyboard,
}

impl Reply {
    pub(crate) fn new(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }

    pub(crate) fn menu(text: impl Into<String>) -> Self {
        Self::new(text, Keyboard::Menu)
    }

    pub(crate) fn cancelable(text: impl Into<String>) -> Self {
        Self::new(text, Keyboard::Cancel)
    }
}

/// Work requested by a transition, carried out by the engine in order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Effect {
    Reply(Reply),
    Persist(NewTransaction),
    /// Expand the plan under a fresh group id and write it as one batch.
    PersistInstallments(InstallmentPlan),
    ShowSummary,
    ShowChart,
    OfferDeletion,
    Delete(Selection),
}
