//! In-process store.
//!
//! Committed state lives behind a single `RwLock`. Each account has its own
//! async mutex in a `DashMap`; a unit of work keeps the owned guards of every
//! account it locked and applies its staged writes in one step on commit.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use moneta_shared::types::{MemberId, PageRequest, PageResponse, TransactionId};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use super::{LedgerStore, MemberStore, StoreError, UnitOfWork, sum_balances};
use crate::ledger::{Account, Transaction};
use crate::member::Member;
use crate::numbering::AccountNumber;

#[derive(Default)]
struct Tables {
    members: Vec<Member>,
    accounts: BTreeMap<AccountNumber, Account>,
    transactions: Vec<Transaction>,
}

#[derive(Default)]
struct Inner {
    tables: RwLock<Tables>,
    locks: DashMap<AccountNumber, Arc<Mutex<()>>>,
    fail_next_commit: AtomicBool,
}

/// Store that keeps everything in memory.
///
/// Cloning is cheap and every clone shares the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Inner>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next commit fail with `StoreError::Unavailable`.
    ///
    /// Used to exercise the rollback path.
    pub fn fail_next_commit(&self) {
        self.inner.fail_next_commit.store(true, Ordering::SeqCst);
    }

    fn lock_for(&self, number: &AccountNumber) -> Arc<Mutex<()>> {
        Arc::clone(self.inner.locks.entry(number.clone()).or_default().value())
    }
}

/// Unit of work over an [`InMemoryStore`].
pub struct MemoryUnitOfWork {
    store: InMemoryStore,
    guards: HashMap<AccountNumber, OwnedMutexGuard<()>>,
    locked: HashMap<AccountNumber, Account>,
    new_accounts: BTreeMap<AccountNumber, Account>,
    new_transactions: Vec<Transaction>,
}

impl MemoryUnitOfWork {
    fn new(store: InMemoryStore) -> Self {
        Self {
            store,
            guards: HashMap::new(),
            locked: HashMap::new(),
            new_accounts: BTreeMap::new(),
            new_transactions: Vec::new(),
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn lock_account(&mut self, number: &AccountNumber) -> Result<Option<Account>, StoreError> {
        if let Some(account) = self.locked.get(number) {
            return Ok(Some(account.clone()));
        }
        if let Some(account) = self.new_accounts.get(number) {
            return Ok(Some(account.clone()));
        }

        if !self.store.inner.tables.read().await.accounts.contains_key(number) {
            return Ok(None);
        }

        let guard = self.store.lock_for(number).lock_owned().await;

        // Re-read under the lock: a previous holder may have committed.
        let current = self.store.inner.tables.read().await.accounts.get(number).cloned();
        match current {
            Some(account) => {
                self.guards.insert(number.clone(), guard);
                self.locked.insert(number.clone(), account.clone());
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    async fn insert_account(&mut self, account: &Account) -> Result<(), StoreError> {
        let number = &account.account_number;
        let taken = self.new_accounts.contains_key(number)
            || self.store.inner.tables.read().await.accounts.contains_key(number);
        if taken {
            return Err(StoreError::Conflict(format!("account number {number} already exists")));
        }
        self.new_accounts.insert(number.clone(), account.clone());
        Ok(())
    }

    async fn save_account(&mut self, account: &Account) -> Result<(), StoreError> {
        let number = &account.account_number;
        if let Some(slot) = self.locked.get_mut(number) {
            *slot = account.clone();
            return Ok(());
        }
        if let Some(slot) = self.new_accounts.get_mut(number) {
            *slot = account.clone();
            return Ok(());
        }
        Err(StoreError::Backend(format!(
            "account {number} was saved without being locked"
        )))
    }

    async fn insert_transaction(&mut self, transaction: &Transaction) -> Result<(), StoreError> {
        self.new_transactions.push(transaction.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let this = *self;
        if this.store.inner.fail_next_commit.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("commit rejected".to_string()));
        }

        let mut tables = this.store.inner.tables.write().await;
        if let Some(number) = this
            .new_accounts
            .keys()
            .find(|number| tables.accounts.contains_key(*number))
        {
            return Err(StoreError::Conflict(format!("account number {number} already exists")));
        }

        tables.accounts.extend(this.locked);
        tables.accounts.extend(this.new_accounts);
        tables.transactions.extend(this.new_transactions);
        drop(tables);
        drop(this.guards);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }
}

#[async_trait]
impl LedgerStore for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        Ok(Box::new(MemoryUnitOfWork::new(self.clone())))
    }

    async fn find_account_by_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.tables.read().await.accounts.get(number).cloned())
    }

    async fn account_number_exists(&self, number: &AccountNumber) -> Result<bool, StoreError> {
        Ok(self.inner.tables.read().await.accounts.contains_key(number))
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.inner.tables.read().await.accounts.values().cloned().collect())
    }

    async fn list_accounts_by_member(&self, member_id: MemberId) -> Result<Vec<Account>, StoreError> {
        let tables = self.inner.tables.read().await;
        Ok(tables
            .accounts
            .values()
            .filter(|account| account.member_id == member_id)
            .cloned()
            .collect())
    }

    async fn count_accounts(&self) -> Result<u64, StoreError> {
        Ok(self.inner.tables.read().await.accounts.len() as u64)
    }

    async fn total_active_balance(&self) -> Result<Decimal, StoreError> {
        let tables = self.inner.tables.read().await;
        sum_balances(
            tables
                .accounts
                .values()
                .filter(|account| account.is_active())
                .map(Account::balance),
        )
    }

    async fn find_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        let tables = self.inner.tables.read().await;
        Ok(tables.transactions.iter().find(|tx| tx.id == id).cloned())
    }

    async fn find_transactions_by_account(
        &self,
        number: &AccountNumber,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, StoreError> {
        let page = page.normalized();
        let tables = self.inner.tables.read().await;
        let matching: Vec<&Transaction> = tables
            .transactions
            .iter()
            .rev()
            .filter(|tx| tx.involves(number))
            .collect();

        let total = matching.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let data = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    async fn count_transactions(&self) -> Result<u64, StoreError> {
        Ok(self.inner.tables.read().await.transactions.len() as u64)
    }
}

#[async_trait]
impl MemberStore for InMemoryStore {
    async fn create_member(&self, member: &Member) -> Result<(), StoreError> {
        let mut tables = self.inner.tables.write().await;
        if tables.members.iter().any(|m| m.email == member.email) {
            return Err(StoreError::Conflict(format!("email {} already exists", member.email)));
        }
        tables.members.push(member.clone());
        Ok(())
    }

    async fn find_member(&self, id: MemberId) -> Result<Option<Member>, StoreError> {
        let tables = self.inner.tables.read().await;
        Ok(tables.members.iter().find(|m| m.id == id).cloned())
    }

    async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
        let email = email.trim().to_lowercase();
        let tables = self.inner.tables.read().await;
        Ok(tables.members.iter().find(|m| m.email == email).cloned())
    }

    async fn list_members(&self) -> Result<Vec<Member>, StoreError> {
        Ok(self.inner.tables.read().await.members.clone())
    }

    async fn count_members(&self) -> Result<u64, StoreError> {
        Ok(self.inner.tables.read().await.members.len() as u64)
    }
}
