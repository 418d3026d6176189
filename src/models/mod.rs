mod installment;
mod transaction;

pub(crate) use installment::{check_split, InstallmentPlan, MAX_INSTALLMENTS, MIN_INSTALLMENTS};
pub(crate) use transaction::{Kind, NewTransaction, TransactionRecord, UserId};
