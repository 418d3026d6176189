mod schema;

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use regex::Regex;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::*;
use crate::store::{GroupSummary, GroupedFilter, MonthlyTotal, TransactionStore};

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, kind, amount, date, description, group_id, created_at FROM transactions";

static INSTALLMENT_SUFFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[ ]*\([0-9]+/[0-9]+\)$").ok());

pub(crate) struct Database {
    conn: Connection,
}

impl Database {
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database: {}", path.display()))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .context("Failed to set database pragmas")?;
        let mut db = Self { conn };
        db.migrate().context("Database migration failed")?;
        Ok(db)
    }

    #[cfg(test)]
    pub(crate) fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let mut db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&mut self) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database - apply full schema
            let tx = self.conn.transaction()?;
            tx.execute_batch(schema::SCHEMA)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
            tracing::info!("created database schema v{}", schema::CURRENT_VERSION);
            return Ok(());
        }

        let current: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        if current >= schema::CURRENT_VERSION {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        for &(from_version, sql) in schema::MIGRATIONS {
            if current <= from_version {
                tx.execute_batch(sql)?;
            }
        }
        tx.execute(
            "UPDATE schema_version SET version = ?1",
            params![schema::CURRENT_VERSION],
        )?;
        tx.commit()?;
        tracing::info!(
            "migrated database schema from v{current} to v{}",
            schema::CURRENT_VERSION
        );

        Ok(())
    }

    fn query_records(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::types::ToSql],
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, |row| {
            Ok(RawRecord {
                id: row.get(0)?,
                user_id: row.get(1)?,
                kind: row.get(2)?,
                amount: row.get(3)?,
                date: row.get(4)?,
                description: row.get(5)?,
                group_id: row.get(6)?,
                created_at: row.get(7)?,
            })
        })?;
        rows.map(|raw| raw?.decode())
            .collect::<Result<Vec<_>, StoreError>>()
    }
}

/// A row exactly as SQLite hands it back, before validation.
struct RawRecord {
    id: i64,
    user_id: i64,
    kind: String,
    amount: String,
    date: String,
    description: String,
    group_id: Option<String>,
    created_at: String,
}

impl RawRecord {
    fn decode(self) -> Result<TransactionRecord, StoreError> {
        let kind = Kind::parse(&self.kind)
            .ok_or_else(|| StoreError::Corrupt(format!("row {}: kind '{}'", self.id, self.kind)))?;
        Ok(TransactionRecord {
            id: self.id,
            user_id: UserId(self.user_id),
            kind,
            amount: decode_amount(&self.amount)?,
            date: decode_date(&self.date)?,
            description: self.description,
            group_id: self.group_id.filter(|g| !g.is_empty()),
            created_at: self.created_at,
        })
    }
}

fn decode_amount(s: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(s).map_err(|e| StoreError::Corrupt(format!("amount '{s}': {e}")))
}

fn decode_date(s: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| StoreError::Corrupt(format!("date '{s}': {e}")))
}

/// "Laptop (1/12)" -> "Laptop"
fn strip_installment_suffix(description: &str) -> String {
    match INSTALLMENT_SUFFIX.as_ref() {
        Some(re) => re.replace(description, "").trim().to_string(),
        None => description.trim().to_string(),
    }
}

/// Register `group_id` for `user` unless it is already known.
fn ensure_group(
    conn: &Connection,
    group_id: &str,
    user: UserId,
    created_at: &str,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO installment_groups (id, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![group_id, user.0, created_at],
    )?;
    Ok(())
}

fn checked_sum(amounts: impl IntoIterator<Item = Decimal>) -> Result<Decimal, StoreError> {
    amounts.into_iter().try_fold(Decimal::ZERO, |total, amount| {
        total.checked_add(amount).ok_or(StoreError::Overflow)
    })
}

fn insert_row(
    conn: &Connection,
    record: &NewTransaction,
    created_at: &str,
) -> Result<i64, StoreError> {
    conn.execute(
        "INSERT INTO transactions (user_id, kind, amount, date, description, group_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            record.user_id.0,
            record.kind.as_str(),
            record.amount.to_string(),
            record.date.format(DATE_FORMAT).to_string(),
            record.description,
            record.group_id,
            created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

impl TransactionStore for Database {
    fn insert(&mut self, record: &NewTransaction) -> Result<i64, StoreError> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        if let Some(group_id) = &record.group_id {
            ensure_group(&tx, group_id, record.user_id, &now)?;
        }
        let id = insert_row(&tx, record, &now)?;
        tx.commit()?;
        tracing::info!(
            "inserted {} #{id} for user {} ({})",
            record.kind,
            record.user_id,
            record.amount
        );
        Ok(id)
    }

    fn insert_batch(&mut self, records: &[NewTransaction]) -> Result<Vec<i64>, StoreError> {
        let now = chrono::Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;

        let groups: BTreeSet<(&str, UserId)> = records
            .iter()
            .filter_map(|r| r.group_id.as_deref().map(|g| (g, r.user_id)))
            .collect();
        for (group_id, user) in &groups {
            ensure_group(&tx, group_id, *user, &now)?;
        }

        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            ids.push(insert_row(&tx, record, &now)?);
        }
        tx.commit()?;

        tracing::info!(
            "inserted batch of {} records across {} group(s)",
            ids.len(),
            groups.len()
        );
        Ok(ids)
    }

    fn delete_by_id(&mut self, user: UserId, id: i64) -> Result<bool, StoreError> {
        let deleted = self.conn.execute(
            "DELETE FROM transactions WHERE id = ?1 AND user_id = ?2",
            params![id, user.0],
        )?;
        if deleted > 0 {
            tracing::info!("deleted record #{id} for user {user}");
        }
        Ok(deleted > 0)
    }

    fn delete_by_group(&mut self, user: UserId, group_id: &str) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let deleted = tx.execute(
            "DELETE FROM transactions WHERE group_id = ?1 AND user_id = ?2",
            params![group_id, user.0],
        )?;
        tx.execute(
            "DELETE FROM installment_groups WHERE id = ?1 AND user_id = ?2",
            params![group_id, user.0],
        )?;
        tx.commit()?;
        if deleted > 0 {
            tracing::info!("deleted group {group_id} ({deleted} records) for user {user}");
        }
        Ok(deleted)
    }

    fn sum_by_kind(&self, user: UserId, kind: Kind) -> Result<Decimal, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT amount FROM transactions WHERE user_id = ?1 AND kind = ?2")?;
        let rows = stmt.query_map(params![user.0, kind.as_str()], |row| row.get::<_, String>(0))?;
        let amounts = rows
            .map(|amount| decode_amount(&amount?))
            .collect::<Result<Vec<_>, StoreError>>()?;
        checked_sum(amounts)
    }

    fn list_recent(
        &self,
        user: UserId,
        limit: usize,
        filter: GroupedFilter,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let condition = match filter {
            GroupedFilter::All => "",
            GroupedFilter::StandaloneOnly => " AND (group_id IS NULL OR group_id = '')",
            GroupedFilter::GroupedOnly => " AND group_id IS NOT NULL AND group_id != ''",
        };
        let sql = format!("{SELECT_COLUMNS} WHERE user_id = ?1{condition} ORDER BY id DESC LIMIT ?2");
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_records(&sql, params![user.0, limit])
    }

    fn list_recent_groups(
        &self,
        user: UserId,
        limit: usize,
    ) -> Result<Vec<GroupSummary>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT group_id FROM transactions
             WHERE user_id = ?1 AND group_id IS NOT NULL AND group_id != ''
             GROUP BY group_id
             ORDER BY MIN(id) DESC
             LIMIT ?2",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let group_ids = stmt
            .query_map(params![user.0, limit], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let member_sql = format!("{SELECT_COLUMNS} WHERE group_id = ?1 AND user_id = ?2 ORDER BY id");
        let mut summaries = Vec::with_capacity(group_ids.len());
        for group_id in group_ids {
            let members = self.query_records(&member_sql, params![group_id, user.0])?;
            let Some(first) = members.first() else {
                continue;
            };
            summaries.push(GroupSummary {
                first_date: members.iter().map(|m| m.date).min().unwrap_or(first.date),
                base_description: strip_installment_suffix(&first.description),
                count: members.len(),
                total_amount: checked_sum(members.iter().map(|m| m.amount))?,
                group_id,
            });
        }
        Ok(summaries)
    }

    fn monthly_series(&self, user: UserId) -> Result<Vec<MonthlyTotal>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT substr(date, 1, 7), kind, amount FROM transactions WHERE user_id = ?1")?;
        let rows = stmt.query_map(params![user.0], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut totals: BTreeMap<(String, Kind), Decimal> = BTreeMap::new();
        for row in rows {
            let (month, kind, amount) = row?;
            let kind = Kind::parse(&kind)
                .ok_or_else(|| StoreError::Corrupt(format!("kind '{kind}'")))?;
            let total = totals.entry((month, kind)).or_default();
            *total = total
                .checked_add(decode_amount(&amount)?)
                .ok_or(StoreError::Overflow)?;
        }

        Ok(totals
            .into_iter()
            .map(|((month, kind), total)| MonthlyTotal { month, kind, total })
            .collect())
    }
}

#[cfg(test)]
mod tests;
