mod amount;
mod date;

pub(crate) use amount::{parse_amount, parse_installment_count, MAX_AMOUNT};
pub(crate) use date::{format_date, parse_date};
