//! Accounts and the balance primitives that guard them.
//!
//! This module implements:
//! - The `Account` aggregate, whose balance is private to this module
//! - `AccountLedger`, the only code path that changes a balance
//! - Immutable `Transaction` records
//! - Amount and opening-balance validation
//! - Error types shared by every ledger operation

pub mod account;
pub mod error;
pub mod service;
pub mod transaction;
pub mod validation;

#[cfg(test)]
mod service_props;

pub use account::{Account, AccountStatus};
pub use error::{ErrorKind, LedgerError};
pub use service::AccountLedger;
pub use transaction::{Transaction, TransactionStatus, TransactionType};
pub use validation::{MAX_AMOUNT, MONEY_SCALE, validate_amount, validate_opening_balance};
