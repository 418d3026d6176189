//! Picking and removing recent records, treating an installment purchase as
//! a single deletable unit.

use crate::error::StoreError;
use crate::models::{TransactionRecord, UserId};
use crate::parse::format_date;
use crate::store::{GroupSummary, GroupedFilter, TransactionStore};
use crate::util::{format_amount, truncate};

/// How many standalone records and how many groups are offered.
pub(crate) const CANDIDATE_LIMIT: usize = 5;

const RECORD_PREFIX: &str = "del_";
const GROUP_PREFIX: &str = "delgroup_";

/// Something the user can pick for deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selection {
    Record(i64),
    Group(String),
}

impl Selection {
    /// Decode a choice id produced by [Selection::choice_id].
    pub(crate) fn parse(choice_id: &str) -> Option<Self> {
        if let Some(group_id) = choice_id.strip_prefix(GROUP_PREFIX) {
            return (!group_id.is_empty()).then(|| Self::Group(group_id.to_string()));
        }
        choice_id
            .strip_prefix(RECORD_PREFIX)
            .and_then(|id| id.parse().ok())
            .map(Self::Record)
    }

    pub(crate) fn choice_id(&self) -> String {
        match self {
            Self::Record(id) => format!("{RECORD_PREFIX}{id}"),
            Self::Group(group_id) => format!("{GROUP_PREFIX}{group_id}"),
        }
    }
}

/// A selectable option with its button label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Choice {
    pub(crate) id: String,
    pub(crate) label: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct Candidates {
    pub(crate) standalone: Vec<TransactionRecord>,
    pub(crate) groups: Vec<GroupSummary>,
}

impl Candidates {
    pub(crate) fn is_empty(&self) -> bool {
        self.standalone.is_empty() && self.groups.is_empty()
    }

    /// Standalone records first, then groups, each most recent first.
    pub(crate) fn choices(&self) -> Vec<Choice> {
        let records = self.standalone.iter().map(|r| Choice {
            id: Selection::Record(r.id).choice_id(),
            label: format!(
                "{} {} ({}) - {}",
                r.kind.icon(),
                format_amount(r.amount),
                format_date(r.date),
                truncate(&r.description, 12)
            ),
        });
        let groups = self.groups.iter().map(|g| Choice {
            id: Selection::Group(g.group_id.clone()).choice_id(),
            label: format!(
                "🗑️ All installments: {} ({}x, {} total, from {})",
                truncate(&g.base_description, 20),
                g.count,
                format_amount(g.total_amount),
                format_date(g.first_date)
            ),
        });
        records.chain(groups).collect()
    }
}

/// The most recent standalone records and installment groups of `user`.
pub(crate) fn list_candidates<S: TransactionStore + ?Sized>(
    store: &S,
    user: UserId,
) -> Result<Candidates, StoreError> {
    Ok(Candidates {
        standalone: store.list_recent(user, CANDIDATE_LIMIT, GroupedFilter::StandaloneOnly)?,
        groups: store.list_recent_groups(user, CANDIDATE_LIMIT)?,
    })
}

pub(crate) fn delete_record<S: TransactionStore + ?Sized>(
    store: &mut S,
    user: UserId,
    id: i64,
) -> Result<(), StoreError> {
    if store.delete_by_id(user, id)? {
        Ok(())
    } else {
        Err(StoreError::NotFound)
    }
}

/// Remove every installment of the group. Returns how many records went.
pub(crate) fn delete_group<S: TransactionStore + ?Sized>(
    store: &mut S,
    user: UserId,
    group_id: &str,
) -> Result<usize, StoreError> {
    match store.delete_by_group(user, group_id)? {
        0 => Err(StoreError::NotFound),
        n => Ok(n),
    }
}

/// What a successful deletion removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deleted {
    Record,
    Group { count: usize },
}

pub(crate) fn delete<S: TransactionStore + ?Sized>(
    store: &mut S,
    user: UserId,
    selection: &Selection,
) -> Result<Deleted, StoreError> {
    match selection {
        Selection::Record(id) => delete_record(store, user, *id).map(|()| Deleted::Record),
        Selection::Group(group_id) => {
            delete_group(store, user, group_id).map(|count| Deleted::Group { count })
        }
    }
}
