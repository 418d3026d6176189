use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::Kind;

/// Where a user is in the capture flow. Each variant carries the fields
/// collected so far, so leaving a state drops them with it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum ConvState {
    #[default]
    Idle,
    AwaitingAmount {
        kind: Kind,
    },
    AwaitingDate {
        kind: Kind,
        amount: Decimal,
    },
    AwaitingDescription {
        kind: Kind,
        amount: Decimal,
        date: NaiveDate,
    },
    AwaitingInstallmentTotal,
    AwaitingInstallmentCount {
        total: Decimal,
    },
    AwaitingInstallmentFirstDate {
        total: Decimal,
        count: u32,
    },
    AwaitingInstallmentDescription {
        total: Decimal,
        count: u32,
        first_date: NaiveDate,
    },
}

impl ConvState {
    pub(crate) fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::AwaitingAmount { .. } => "AwaitingAmount",
            Self::AwaitingDate { .. } => "AwaitingDate",
            Self::AwaitingDescription { .. } => "AwaitingDescription",
            Self::AwaitingInstallmentTotal => "AwaitingInstallmentTotal",
            Self::AwaitingInstallmentCount { .. } => "AwaitingInstallmentCount",
            Self::AwaitingInstallmentFirstDate { .. } => "AwaitingInstallmentFirstDate",
            Self::AwaitingInstallmentDescription { .. } => "AwaitingInstallmentDescription",
        }
    }
}

impl std::fmt::Display for ConvState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-user conversation slot held by the session store.
#[derive(Debug)]
pub(crate) struct Session {
    pub(crate) state: ConvState,
    pub(crate) last_seen: Instant,
}

impl Session {
    pub(crate) fn new() -> Self {
        Self {
            state: ConvState::Idle,
            last_seen: Instant::now(),
        }
    }

    /// A flow left untouched for longer than `timeout`.
    pub(crate) fn is_stale(&self, now: Instant, timeout: Duration) -> bool {
        !self.state.is_idle() && now.saturating_duration_since(self.last_seen) > timeout
    }
}
