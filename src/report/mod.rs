//! Balance summary and the monthly series behind the chart.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

use crate::error::StoreError;
use crate::models::{Kind, UserId};
use crate::store::TransactionStore;
use crate::util::format_amount;

/// Totals for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Summary {
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) saved: Decimal,
    /// Money that is neither spent nor set aside.
    pub(crate) available: Decimal,
    pub(crate) total: Decimal,
}

impl Summary {
    /// Fails with [StoreError::Overflow] when the totals do not fit.
    pub(crate) fn new(
        income: Decimal,
        expense: Decimal,
        saved: Decimal,
    ) -> Result<Self, StoreError> {
        let available = income.checked_sub(expense).ok_or(StoreError::Overflow)?;
        let total = available.checked_add(saved).ok_or(StoreError::Overflow)?;
        Ok(Self {
            income,
            expense,
            saved,
            available,
            total,
        })
    }

    pub(crate) fn for_user<S: TransactionStore + ?Sized>(
        store: &S,
        user: UserId,
    ) -> Result<Self, StoreError> {
        Self::new(
            store.sum_by_kind(user, Kind::Income)?,
            store.sum_by_kind(user, Kind::Expense)?,
            store.sum_by_kind(user, Kind::Saved)?,
        )
    }

    pub(crate) fn render(&self) -> String {
        format!(
            "📊 Your summary\n\n\
             💼 Available: {}\n\
             🏦 Saved: {}\n\
             💎 Total: {}",
            format_amount(self.available),
            format_amount(self.saved),
            format_amount(self.total),
        )
    }
}

/// One month of the chart.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct MonthRow {
    /// Format: "YYYY-MM"
    pub(crate) month: String,
    pub(crate) income: Decimal,
    pub(crate) expense: Decimal,
    pub(crate) saved: Decimal,
}

/// Monthly income, expense and savings, oldest month first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct MonthlySeries {
    pub(crate) rows: Vec<MonthRow>,
}

impl MonthlySeries {
    pub(crate) fn for_user<S: TransactionStore + ?Sized>(
        store: &S,
        user: UserId,
    ) -> Result<Self, StoreError> {
        let mut months: BTreeMap<String, MonthRow> = BTreeMap::new();
        for total in store.monthly_series(user)? {
            let row = months.entry(total.month.clone()).or_insert_with(|| MonthRow {
                month: total.month,
                ..MonthRow::default()
            });
            match total.kind {
                Kind::Income => row.income += total.total,
                Kind::Expense => row.expense += total.total,
                Kind::Saved => row.saved += total.total,
            }
        }
        Ok(Self {
            rows: months.into_values().collect(),
        })
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn render(&self) -> String {
        if self.is_empty() {
            return "❌ No data to chart yet.\nRecord a transaction first!".into();
        }
        let mut out = format!(
            "📈 Monthly overview\n{:<8} {:>12} {:>12} {:>12}",
            "Month", "Income", "Expenses", "Saved"
        );
        for row in &self.rows {
            out.push_str(&format!(
                "\n{:<8} {:>12} {:>12} {:>12}",
                row.month,
                format_amount(row.income),
                format_amount(row.expense),
                format_amount(row.saved),
            ));
        }
        out
    }

    /// Write the series as CSV with a header row. Returns the number of months written.
    pub(crate) fn write_csv(&self, path: &Path) -> Result<usize> {
        let mut wtr = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        wtr.write_record(["month", "income", "expense", "saved"])?;
        for row in &self.rows {
            wtr.write_record([
                row.month.clone(),
                row.income.to_string(),
                row.expense.to_string(),
                row.saved.to_string(),
            ])?;
        }
        wtr.flush()?;
        Ok(self.rows.len())
    }
}
