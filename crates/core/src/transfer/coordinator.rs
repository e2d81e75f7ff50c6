//! Transfer orchestration.
//!
//! Every movement runs inside one unit of work: lock the accounts, validate,
//! apply the balance primitives, save, record, commit. Any failure rolls the
//! unit of work back so no partial state is ever visible.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::types::{
    DepositRequest, TransferRequest, TransferStage, WithdrawalRequest, clean_description,
};
use crate::ledger::{Account, AccountLedger, LedgerError, Transaction, validate_amount};
use crate::numbering::AccountNumber;
use crate::store::{LedgerStore, StoreError, UnitOfWork};

/// Runs money movements against a [`LedgerStore`].
#[derive(Clone)]
pub struct TransferCoordinator {
    store: Arc<dyn LedgerStore>,
}

impl TransferCoordinator {
    /// Creates a coordinator over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Moves `amount` from one account to another and records a `TRANSFER`.
    ///
    /// Both accounts are locked in ascending account-number order, so
    /// concurrent transfers in opposite directions cannot deadlock.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound` for the source, then for the destination
    /// - `SameAccountTransfer`, `InvalidAmount`, `InsufficientBalance`
    /// - `BalanceLimitExceeded` if the destination would pass the ceiling
    /// - `Durability` if the store fails; nothing is applied
    pub async fn transfer(&self, request: TransferRequest) -> Result<Transaction, LedgerError> {
        let TransferRequest {
            from_account_number: from,
            to_account_number: to,
            amount,
            description,
        } = request;
        debug!(%from, %to, %amount, "Transfer requested");

        let mut uow = self.begin("transfer").await?;
        let mut stage = TransferStage::Resolving;
        let outcome = Self::run_transfer(
            uow.as_mut(),
            &mut stage,
            &from,
            &to,
            amount,
            clean_description(description),
        )
        .await;

        let result = settle(uow, "transfer", stage, outcome).await;
        if let Ok(tx) = &result {
            info!(
                transaction_id = %tx.id,
                from = %from,
                to = %to,
                amount = %tx.amount,
                stage = %TransferStage::Done,
                "Transfer completed"
            );
        }
        result
    }

    /// Adds `amount` to an account and records a `DEPOSIT`.
    ///
    /// # Errors
    ///
    /// `AccountNotFound`, `InvalidAmount`, `BalanceLimitExceeded`, or
    /// `Durability`.
    pub async fn deposit(&self, request: DepositRequest) -> Result<Transaction, LedgerError> {
        let DepositRequest {
            account,
            amount,
            description,
        } = request;

        let mut uow = self.begin("deposit").await?;
        let mut stage = TransferStage::Resolving;
        let outcome = async {
            let mut target = lock_one(uow.as_mut(), &account).await?;
            stage = TransferStage::Validating;
            let amount = validate_amount(amount)?;

            stage = TransferStage::Applying;
            AccountLedger::deposit(&mut target, amount)?;
            uow.save_account(&target).await?;

            stage = TransferStage::Recording;
            let tx = Transaction::deposit(
                target.account_number.clone(),
                amount,
                clean_description(description),
            );
            uow.insert_transaction(&tx).await?;
            Ok::<_, LedgerError>(tx)
        }
        .await;

        let result = settle(uow, "deposit", stage, outcome).await;
        if let Ok(tx) = &result {
            info!(transaction_id = %tx.id, account = %account, amount = %tx.amount, "Deposit completed");
        }
        result
    }

    /// Removes `amount` from an account and records a `WITHDRAWAL`.
    ///
    /// # Errors
    ///
    /// `AccountNotFound`, `InvalidAmount`, `InsufficientBalance`, or
    /// `Durability`.
    pub async fn withdraw(&self, request: WithdrawalRequest) -> Result<Transaction, LedgerError> {
        let WithdrawalRequest {
            account,
            amount,
            description,
        } = request;

        let mut uow = self.begin("withdrawal").await?;
        let mut stage = TransferStage::Resolving;
        let outcome = async {
            let mut source = lock_one(uow.as_mut(), &account).await?;
            stage = TransferStage::Validating;
            let amount = validate_amount(amount)?;

            stage = TransferStage::Applying;
            AccountLedger::withdraw(&mut source, amount)?;
            uow.save_account(&source).await?;

            stage = TransferStage::Recording;
            let tx = Transaction::withdrawal(
                source.account_number.clone(),
                amount,
                clean_description(description),
            );
            uow.insert_transaction(&tx).await?;
            Ok::<_, LedgerError>(tx)
        }
        .await;

        let result = settle(uow, "withdrawal", stage, outcome).await;
        if let Ok(tx) = &result {
            info!(transaction_id = %tx.id, account = %account, amount = %tx.amount, "Withdrawal completed");
        }
        result
    }

    async fn begin(&self, operation: &'static str) -> Result<Box<dyn UnitOfWork>, LedgerError> {
        self.store.begin().await.map_err(|e| {
            error!(operation, error = %e, "Failed to open unit of work");
            LedgerError::Durability(e)
        })
    }

    async fn run_transfer(
        uow: &mut dyn UnitOfWork,
        stage: &mut TransferStage,
        from: &str,
        to: &str,
        amount: Decimal,
        description: Option<String>,
    ) -> Result<Transaction, LedgerError> {
        let (mut source, mut destination) = lock_pair(uow, from, to).await?;

        *stage = TransferStage::Validating;
        if source.id == destination.id {
            return Err(LedgerError::SameAccountTransfer);
        }
        let amount = validate_amount(amount)?;
        if !AccountLedger::has_sufficient_funds(&source, amount) {
            return Err(LedgerError::InsufficientBalance {
                balance: source.balance(),
                requested: amount,
            });
        }

        *stage = TransferStage::Applying;
        AccountLedger::withdraw(&mut source, amount)?;
        AccountLedger::deposit(&mut destination, amount)?;
        uow.save_account(&source).await?;
        uow.save_account(&destination).await?;

        *stage = TransferStage::Recording;
        let tx = Transaction::transfer(
            source.account_number.clone(),
            destination.account_number.clone(),
            amount,
            description,
        );
        uow.insert_transaction(&tx).await?;
        Ok(tx)
    }
}

/// Locks a single account by its raw number.
async fn lock_one(uow: &mut dyn UnitOfWork, raw: &str) -> Result<Account, LedgerError> {
    let Ok(number) = AccountNumber::parse(raw) else {
        return Err(LedgerError::AccountNotFound(raw.to_string()));
    };
    uow.lock_account(&number)
        .await?
        .ok_or_else(|| LedgerError::AccountNotFound(raw.to_string()))
}

/// Locks both sides of a transfer in ascending account-number order.
///
/// A number that does not parse is treated as an account that does not
/// exist. The source is reported missing before the destination.
async fn lock_pair(
    uow: &mut dyn UnitOfWork,
    from: &str,
    to: &str,
) -> Result<(Account, Account), LedgerError> {
    let from_number = AccountNumber::parse(from).ok();
    let to_number = AccountNumber::parse(to).ok();

    let mut order: Vec<&AccountNumber> = from_number.iter().chain(to_number.iter()).collect();
    order.sort();
    order.dedup();

    let mut locked: HashMap<&AccountNumber, Account> = HashMap::with_capacity(order.len());
    for number in order {
        if let Some(account) = uow.lock_account(number).await? {
            locked.insert(number, account);
        }
    }

    let source = from_number
        .as_ref()
        .and_then(|n| locked.get(n).cloned())
        .ok_or_else(|| LedgerError::AccountNotFound(from.to_string()))?;
    let destination = to_number
        .as_ref()
        .and_then(|n| locked.get(n).cloned())
        .ok_or_else(|| LedgerError::AccountNotFound(to.to_string()))?;

    Ok((source, destination))
}

/// Commits on success, rolls back on failure.
///
/// Business errors pass through unchanged. Store failures during commit are
/// reported as `Durability`.
pub(crate) async fn settle<T>(
    uow: Box<dyn UnitOfWork>,
    operation: &'static str,
    stage: TransferStage,
    outcome: Result<T, LedgerError>,
) -> Result<T, LedgerError> {
    match outcome {
        Ok(value) => match uow.commit().await {
            Ok(()) => Ok(value),
            Err(e) => {
                error!(operation, stage = %stage, error = %e, "Commit failed, nothing was applied");
                Err(LedgerError::Durability(e))
            }
        },
        Err(err) => {
            if let Err(e) = uow.rollback().await {
                warn!(operation, error = %e, "Rollback failed");
            }
            log_failure(operation, stage, &err);
            Err(err)
        }
    }
}

fn log_failure(operation: &'static str, stage: TransferStage, err: &LedgerError) {
    match err {
        LedgerError::Durability(StoreError::Conflict(detail)) => {
            warn!(operation, stage = %stage, next = %TransferStage::Failed, detail = %detail, "Store conflict");
        }
        LedgerError::Durability(e) => {
            error!(operation, stage = %stage, next = %TransferStage::Failed, error = %e, "Store failure, rolled back");
        }
        other => {
            info!(
                operation,
                stage = %stage,
                next = %TransferStage::Failed,
                code = other.error_code(),
                reason = %other,
                "Rejected"
            );
        }
    }
}
