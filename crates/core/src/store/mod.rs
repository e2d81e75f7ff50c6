//! Storage seams for the ledger.
//!
//! The core never talks to a database directly. It reads through
//! [`LedgerStore`] and [`MemberStore`], and writes only inside a
//! [`UnitOfWork`]: the balance changes and the transaction record of one
//! movement are committed together or not at all.

pub mod memory;

use async_trait::async_trait;
use moneta_shared::types::{MemberId, PageRequest, PageResponse, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ledger::{Account, MONEY_SCALE, Transaction};
use crate::member::Member;
use crate::numbering::AccountNumber;

pub use memory::InMemoryStore;

/// Failures reported by a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The store could not be reached or refused the work.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("store error: {0}")]
    Backend(String),
}

/// Sums account balances at [`MONEY_SCALE`].
///
/// # Errors
///
/// Returns `Backend` if the total does not fit in a `Decimal`.
pub fn sum_balances<I>(balances: I) -> Result<Decimal, StoreError>
where
    I: IntoIterator<Item = Decimal>,
{
    let mut total = balances
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .ok_or_else(|| StoreError::Backend("balance total overflowed".to_string()))?;
    total.rescale(MONEY_SCALE);
    Ok(total)
}

/// An open unit of work.
///
/// Accounts are read for update through [`UnitOfWork::lock_account`], which
/// holds an exclusive per-account lock until the unit of work ends. Dropping
/// a unit of work without committing discards its writes.
#[async_trait]
pub trait UnitOfWork: Send {
    /// Locks an account and returns its current state, or `None` if it does
    /// not exist. Locking an account twice in one unit of work is allowed.
    async fn lock_account(&mut self, number: &AccountNumber) -> Result<Option<Account>, StoreError>;

    /// Stages a new account. Fails with `Conflict` if the number is taken.
    async fn insert_account(&mut self, account: &Account) -> Result<(), StoreError>;

    /// Stages new state for an account previously locked or inserted.
    async fn save_account(&mut self, account: &Account) -> Result<(), StoreError>;

    /// Stages a transaction record.
    async fn insert_transaction(&mut self, transaction: &Transaction) -> Result<(), StoreError>;

    /// Makes every staged write visible and releases the locks.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discards every staged write and releases the locks.
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Account and transaction persistence.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Opens a unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError>;

    /// Reads an account without locking it.
    async fn find_account_by_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, StoreError>;

    /// Returns true if any account already uses the number.
    async fn account_number_exists(&self, number: &AccountNumber) -> Result<bool, StoreError>;

    /// All accounts, ordered by account number.
    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError>;

    /// Accounts owned by one member, ordered by account number.
    async fn list_accounts_by_member(&self, member_id: MemberId) -> Result<Vec<Account>, StoreError>;

    /// Number of accounts.
    async fn count_accounts(&self) -> Result<u64, StoreError>;

    /// Sum of balances over active accounts.
    async fn total_active_balance(&self) -> Result<Decimal, StoreError>;

    /// Reads one transaction record.
    async fn find_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError>;

    /// Transactions where the account is source or destination, most recent
    /// first.
    async fn find_transactions_by_account(
        &self,
        number: &AccountNumber,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, StoreError>;

    /// Number of transaction records.
    async fn count_transactions(&self) -> Result<u64, StoreError>;
}

/// Member persistence.
#[async_trait]
pub trait MemberStore: Send + Sync {
    /// Stores a new member. Fails with `Conflict` if the email is taken.
    async fn create_member(&self, member: &Member) -> Result<(), StoreError>;

    /// Reads a member by id.
    async fn find_member(&self, id: MemberId) -> Result<Option<Member>, StoreError>;

    /// Reads a member by (lowercased) email.
    async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>, StoreError>;

    /// All members, oldest first.
    async fn list_members(&self) -> Result<Vec<Member>, StoreError>;

    /// Number of members.
    async fn count_members(&self) -> Result<u64, StoreError>;
}
