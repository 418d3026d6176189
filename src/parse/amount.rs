use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::models::{MAX_INSTALLMENTS, MIN_INSTALLMENTS};

/// Largest amount a single entry may carry. Keeps every sum the store and
/// the summary compute far away from `Decimal::MAX`.
pub(crate) const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Parse a money amount typed by the user. Either `,` or `.` works as the
/// decimal separator; the result must be strictly positive and at most
/// [MAX_AMOUNT].
pub(crate) fn parse_amount(text: &str) -> Result<Decimal, ValidationError> {
    let cleaned = text.trim().replace(',', ".");
    if cleaned.is_empty() {
        return Err(ValidationError::InvalidAmount);
    }
    let amount = Decimal::from_str(&cleaned).map_err(|_| ValidationError::InvalidAmount)?;
    if amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge);
    }
    Ok(amount.normalize())
}

/// Parse the number of installments, telling "not a whole number" apart
/// from "outside 2..=36".
pub(crate) fn parse_installment_count(text: &str) -> Result<u32, ValidationError> {
    let n: i64 = text
        .trim()
        .parse()
        .map_err(|_| ValidationError::CountNotInteger)?;
    u32::try_from(n)
        .ok()
        .filter(|n| (MIN_INSTALLMENTS..=MAX_INSTALLMENTS).contains(n))
        .ok_or(ValidationError::CountOutOfRange {
            min: MIN_INSTALLMENTS,
            max: MAX_INSTALLMENTS,
        })
}

#[cfg(test)]
#[path = "amount_tests.rs"]
mod tests;
