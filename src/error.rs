//! Error types shared by the parser, the store and the conversation engine.

/// A user reply that cannot be accepted in the current conversation state.
///
/// These never leave the conversation: the transition turns each one into a
/// re-prompt and keeps the state where it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ValidationError {
    #[error("not a number")]
    InvalidAmount,

    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("amount is above the accepted maximum")]
    AmountTooLarge,

    #[error("date not recognized")]
    InvalidDate,

    /// The installment count was not a whole number.
    #[error("installment count is not an integer")]
    CountNotInteger,

    /// The installment count was a whole number outside the accepted range.
    #[error("installment count must be between {min} and {max}")]
    CountOutOfRange { min: u32, max: u32 },

    /// Splitting the total would produce installments that round to zero.
    #[error("total is too small to split into that many installments")]
    InstallmentTooSmall,

    #[error("description cannot be empty")]
    EmptyDescription,
}

/// Failures reported by a [crate::store::TransactionStore].
#[derive(Debug, thiserror::Error)]
pub(crate) enum StoreError {
    /// The record or group to delete does not exist (or belongs to someone else).
    #[error("nothing found to delete")]
    NotFound,

    #[error("storage failure: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// A total over the stored amounts does not fit in a `Decimal`.
    #[error("amount total out of range")]
    Overflow,

    /// A stored row could not be decoded back into a record.
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Errors that abort a single conversation turn.
#[derive(Debug, thiserror::Error)]
pub(crate) enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A previous turn panicked while holding a session or store lock.
    #[error("a lock was poisoned by an earlier failure")]
    Poisoned,
}
