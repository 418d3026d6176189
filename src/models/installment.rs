use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use super::{Kind, NewTransaction, UserId};
use crate::error::ValidationError;

pub(crate) const MIN_INSTALLMENTS: u32 = 2;
pub(crate) const MAX_INSTALLMENTS: u32 = 36;

/// One purchase split into monthly installments.
///
/// Only lives for the duration of a conversation; once confirmed it is
/// expanded into grouped expense records and dropped.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InstallmentPlan {
    pub(crate) total_amount: Decimal,
    pub(crate) installment_count: u32,
    pub(crate) first_date: NaiveDate,
    pub(crate) base_description: String,
}

impl InstallmentPlan {
    pub(crate) fn new(
        total_amount: Decimal,
        installment_count: u32,
        first_date: NaiveDate,
        base_description: String,
    ) -> Result<Self, ValidationError> {
        check_split(total_amount, installment_count)?;
        Ok(Self {
            total_amount,
            installment_count,
            first_date,
            base_description,
        })
    }

    /// `total / n` rounded to cents.
    pub(crate) fn per_installment_amount(&self) -> Decimal {
        per_installment(self.total_amount, self.installment_count)
    }

    /// Amount of installment `i` (0-based). The last one absorbs the rounding
    /// remainder so the group always sums to the total.
    pub(crate) fn amount_of(&self, i: u32) -> Decimal {
        let per = self.per_installment_amount();
        if i + 1 == self.installment_count {
            self.total_amount - per * Decimal::from(self.installment_count - 1)
        } else {
            per
        }
    }

    /// Date of installment `i` (0-based), clamped to the end of shorter months.
    pub(crate) fn date_of(&self, i: u32) -> NaiveDate {
        add_months(self.first_date, i)
    }

    pub(crate) fn last_date(&self) -> NaiveDate {
        self.date_of(self.installment_count.saturating_sub(1))
    }

    pub(crate) fn description_of(&self, i: u32) -> String {
        format!(
            "{} ({}/{})",
            self.base_description,
            i + 1,
            self.installment_count
        )
    }

    /// Expand the plan into one expense per installment, all tagged with `group_id`.
    pub(crate) fn expand(&self, user_id: UserId, group_id: &str) -> Vec<NewTransaction> {
        (0..self.installment_count)
            .map(|i| NewTransaction {
                user_id,
                kind: Kind::Expense,
                amount: self.amount_of(i),
                date: self.date_of(i),
                description: self.description_of(i),
                group_id: Some(group_id.to_string()),
            })
            .collect()
    }
}

/// Validate that `total` can be split into `count` installments that are all
/// above zero, including the last one that takes the rounding remainder.
pub(crate) fn check_split(total: Decimal, count: u32) -> Result<(), ValidationError> {
    if !(MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(&count) {
        return Err(ValidationError::CountOutOfRange {
            min: MIN_INSTALLMENTS,
            max: MAX_INSTALLMENTS,
        });
    }
    let per = per_installment(total, count);
    let last = total - per * Decimal::from(count - 1);
    if per <= Decimal::ZERO || last <= Decimal::ZERO {
        return Err(ValidationError::InstallmentTooSmall);
    }
    Ok(())
}

fn per_installment(total: Decimal, count: u32) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    (total / Decimal::from(count)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Calendar month addition; 31 Jan + 1 month is the last day of February.
fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
