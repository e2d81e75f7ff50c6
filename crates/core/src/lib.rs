//! Core banking ledger logic for Moneta.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached only through the traits in [`store`].
//!
//! # Modules
//!
//! - `numbering` - Account number format and generation
//! - `ledger` - Accounts, balance primitives, transaction records, errors
//! - `member` - Member registration data and validation
//! - `store` - Store traits, unit of work, in-memory implementation
//! - `transfer` - Atomic money movements between accounts
//! - `bank` - The service surface used by the HTTP layer

pub mod bank;
pub mod ledger;
pub mod member;
pub mod numbering;
pub mod store;
pub mod transfer;

pub use bank::BankService;
pub use ledger::{
    Account, AccountLedger, AccountStatus, ErrorKind, LedgerError, Transaction, TransactionStatus,
    TransactionType,
};
pub use member::{Member, MemberStatus, NewMember};
pub use numbering::{AccountNumber, AccountNumberGenerator};
pub use store::{InMemoryStore, LedgerStore, MemberStore, StoreError, UnitOfWork};
pub use transfer::{DepositRequest, TransferCoordinator, TransferRequest, WithdrawalRequest};
