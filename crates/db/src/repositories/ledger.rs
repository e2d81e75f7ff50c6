//! Postgres ledger store.

use async_trait::async_trait;
use moneta_core::store::sum_balances;
use moneta_core::{Account, AccountNumber, LedgerStore, StoreError, Transaction, UnitOfWork};
use moneta_shared::types::{MemberId, PageRequest, PageResponse, TransactionId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ActiveValue::Unchanged, ColumnTrait, Condition,
    DatabaseConnection, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use tracing::debug;

use super::convert::{account_from_model, store_error, transaction_from_model};
use crate::entities::{accounts, sea_orm_active_enums, transactions};

/// Ledger store backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    db: DatabaseConnection,
}

impl PgLedgerStore {
    /// Creates a new store over a connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// A unit of work over one database transaction.
///
/// Dropping it without committing rolls the database transaction back.
pub struct PgUnitOfWork {
    txn: DatabaseTransaction,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn lock_account(&mut self, number: &AccountNumber) -> Result<Option<Account>, StoreError> {
        let row = accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(number.as_str()))
            .lock_exclusive()
            .one(&self.txn)
            .await
            .map_err(store_error)?;

        row.map(account_from_model).transpose()
    }

    async fn insert_account(&mut self, account: &Account) -> Result<(), StoreError> {
        accounts::ActiveModel {
            id: Set(account.id.into_inner()),
            account_number: Set(account.account_number.to_string()),
            member_id: Set(account.member_id.into_inner()),
            balance: Set(account.balance()),
            status: Set(account.status.into()),
            created_at: Set(account.created_at.into()),
            updated_at: Set(account.updated_at.into()),
        }
        .insert(&self.txn)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn save_account(&mut self, account: &Account) -> Result<(), StoreError> {
        accounts::ActiveModel {
            id: Unchanged(account.id.into_inner()),
            balance: Set(account.balance()),
            status: Set(account.status.into()),
            updated_at: Set(account.updated_at.into()),
            ..Default::default()
        }
        .update(&self.txn)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn insert_transaction(&mut self, transaction: &Transaction) -> Result<(), StoreError> {
        transactions::ActiveModel {
            id: Set(transaction.id.into_inner()),
            from_account: Set(transaction.from_account.as_ref().map(ToString::to_string)),
            to_account: Set(transaction.to_account.to_string()),
            amount: Set(transaction.amount),
            transaction_type: Set(transaction.transaction_type.into()),
            status: Set(transaction.status.into()),
            description: Set(transaction.description.clone()),
            created_at: Set(transaction.created_at.into()),
        }
        .insert(&self.txn)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.commit().await.map_err(store_error)
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.txn.rollback().await.map_err(store_error)
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StoreError> {
        let txn = self.db.begin().await.map_err(store_error)?;
        Ok(Box::new(PgUnitOfWork { txn }))
    }

    async fn find_account_by_number(
        &self,
        number: &AccountNumber,
    ) -> Result<Option<Account>, StoreError> {
        accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(number.as_str()))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(account_from_model)
            .transpose()
    }

    async fn account_number_exists(&self, number: &AccountNumber) -> Result<bool, StoreError> {
        let count = accounts::Entity::find()
            .filter(accounts::Column::AccountNumber.eq(number.as_str()))
            .count(&self.db)
            .await
            .map_err(store_error)?;
        Ok(count > 0)
    }

    async fn list_accounts(&self) -> Result<Vec<Account>, StoreError> {
        accounts::Entity::find()
            .order_by_asc(accounts::Column::AccountNumber)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(account_from_model)
            .collect()
    }

    async fn list_accounts_by_member(&self, member_id: MemberId) -> Result<Vec<Account>, StoreError> {
        accounts::Entity::find()
            .filter(accounts::Column::MemberId.eq(member_id.into_inner()))
            .order_by_asc(accounts::Column::AccountNumber)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(account_from_model)
            .collect()
    }

    async fn count_accounts(&self) -> Result<u64, StoreError> {
        accounts::Entity::find()
            .count(&self.db)
            .await
            .map_err(store_error)
    }

    async fn total_active_balance(&self) -> Result<Decimal, StoreError> {
        let balances: Vec<Decimal> = accounts::Entity::find()
            .select_only()
            .column(accounts::Column::Balance)
            .filter(accounts::Column::Status.eq(sea_orm_active_enums::AccountStatus::Active))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(store_error)?;

        sum_balances(balances)
    }

    async fn find_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(transaction_from_model)
            .transpose()
    }

    async fn find_transactions_by_account(
        &self,
        number: &AccountNumber,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, StoreError> {
        let page = page.normalized();
        let paginator = transactions::Entity::find()
            .filter(
                Condition::any()
                    .add(transactions::Column::FromAccount.eq(number.as_str()))
                    .add(transactions::Column::ToAccount.eq(number.as_str())),
            )
            .order_by_desc(transactions::Column::CreatedAt)
            .order_by_desc(transactions::Column::Id)
            .paginate(&self.db, page.limit());

        let total = paginator.num_items().await.map_err(store_error)?;
        let rows = paginator
            .fetch_page(u64::from(page.page - 1))
            .await
            .map_err(store_error)?;
        debug!(account = %number, page = page.page, rows = rows.len(), total, "Fetched account history");

        let data = rows
            .into_iter()
            .map(transaction_from_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    async fn count_transactions(&self) -> Result<u64, StoreError> {
        transactions::Entity::find()
            .count(&self.db)
            .await
            .map_err(store_error)
    }
}

