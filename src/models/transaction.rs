use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Opaque identifier of the user who owns a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct UserId(pub(crate) i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Kind {
    Expense,
    Income,
    Saved,
}

impl Kind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
            Self::Saved => "saved",
        }
    }

    pub(crate) fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "expense" => Some(Self::Expense),
            "income" => Some(Self::Income),
            "saved" => Some(Self::Saved),
            _ => None,
        }
    }

    #[cfg(test)]
    pub(crate) fn all() -> &'static [Kind] {
        &[Self::Expense, Self::Income, Self::Saved]
    }

    pub(crate) fn icon(&self) -> &'static str {
        match self {
            Self::Expense => "💸",
            Self::Income => "💰",
            Self::Saved => "🏦",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction as it is stored.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionRecord {
    pub(crate) id: i64,
    pub(crate) user_id: UserId,
    pub(crate) kind: Kind,
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
    pub(crate) description: String,
    /// Shared by every installment of one purchase; `None` for standalone records.
    pub(crate) group_id: Option<String>,
    pub(crate) created_at: String,
}

impl TransactionRecord {
    #[cfg(test)]
    pub(crate) fn is_standalone(&self) -> bool {
        !matches!(self.group_id.as_deref(), Some(g) if !g.is_empty())
    }
}

/// A transaction that has not been written yet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NewTransaction {
    pub(crate) user_id: UserId,
    pub(crate) kind: Kind,
    pub(crate) amount: Decimal,
    pub(crate) date: NaiveDate,
    pub(crate) description: String,
    pub(crate) group_id: Option<String>,
}

impl NewTransaction {
    pub(crate) fn standalone(
        user_id: UserId,
        kind: Kind,
        amount: Decimal,
        date: NaiveDate,
        description: String,
    ) -> Self {
        Self {
            user_id,
            kind,
            amount,
            date,
            description,
            group_id: None,
        }
    }
}
