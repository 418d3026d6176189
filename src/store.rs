//! Defines the transaction store trait.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::{Kind, NewTransaction, TransactionRecord, UserId};

/// Durable storage of transactions, queryable by user and by installment group.
pub(crate) trait TransactionStore {
    /// Write one record and return its id.
    fn insert(&mut self, record: &NewTransaction) -> Result<i64, StoreError>;

    /// Write all `records` or none of them.
    ///
    /// Records carrying a group id are linked to that group; the group is
    /// created by this call if it does not exist yet.
    fn insert_batch(&mut self, records: &[NewTransaction]) -> Result<Vec<i64>, StoreError>;

    /// Remove the record `id` owned by `user`. Returns `false` if there was none.
    fn delete_by_id(&mut self, user: UserId, id: i64) -> Result<bool, StoreError>;

    /// Remove every record of the group in one step and return how many went.
    fn delete_by_group(&mut self, user: UserId, group_id: &str) -> Result<usize, StoreError>;

    fn sum_by_kind(&self, user: UserId, kind: Kind) -> Result<Decimal, StoreError>;

    /// Most recent records first, by id.
    fn list_recent(
        &self,
        user: UserId,
        limit: usize,
        filter: GroupedFilter,
    ) -> Result<Vec<TransactionRecord>, StoreError>;

    /// Most recently created installment groups first.
    fn list_recent_groups(&self, user: UserId, limit: usize)
        -> Result<Vec<GroupSummary>, StoreError>;

    /// Totals per calendar month and kind, oldest month first.
    fn monthly_series(&self, user: UserId) -> Result<Vec<MonthlyTotal>, StoreError>;
}

/// Which records [TransactionStore::list_recent] should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupedFilter {
    All,
    StandaloneOnly,
    GroupedOnly,
}

/// One installment purchase as seen from the store.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GroupSummary {
    pub(crate) group_id: String,
    /// Earliest installment date.
    pub(crate) first_date: NaiveDate,
    pub(crate) base_description: String,
    pub(crate) count: usize,
    pub(crate) total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MonthlyTotal {
    /// Format: "YYYY-MM"
    pub(crate) month: String,
    pub(crate) kind: Kind,
    pub(crate) total: Decimal,
}
