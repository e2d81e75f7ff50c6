//! Bank service: account opening, movements, lookups, members.

use std::sync::Arc;

use moneta_shared::LedgerConfig;
use moneta_shared::types::{MemberId, PageRequest, PageResponse, TransactionId};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::ledger::{Account, LedgerError, Transaction, validate_opening_balance};
use crate::member::{Member, NewMember};
use crate::numbering::{AccountNumber, AccountNumberGenerator};
use crate::store::{LedgerStore, MemberStore, StoreError};
use crate::transfer::{DepositRequest, TransferCoordinator, TransferRequest, WithdrawalRequest};

const OPENING_DEPOSIT_DESCRIPTION: &str = "Account opening deposit";

/// Entry point for every ledger operation.
///
/// This is the only place that mints account numbers.
#[derive(Clone)]
pub struct BankService {
    ledger: Arc<dyn LedgerStore>,
    members: Arc<dyn MemberStore>,
    coordinator: TransferCoordinator,
    generator: AccountNumberGenerator,
    config: LedgerConfig,
}

impl BankService {
    /// Creates a service over the given stores.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn LedgerStore>,
        members: Arc<dyn MemberStore>,
        config: LedgerConfig,
    ) -> Self {
        Self {
            coordinator: TransferCoordinator::new(Arc::clone(&ledger)),
            ledger,
            members,
            generator: AccountNumberGenerator::new(),
            config,
        }
    }

    /// Replaces the account number generator.
    #[must_use]
    pub fn with_generator(mut self, generator: AccountNumberGenerator) -> Self {
        self.generator = generator;
        self
    }

    /// Ledger rules in effect.
    #[must_use]
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    fn max_attempts(&self) -> u32 {
        self.config.account_number_max_attempts.max(1)
    }

    // ========== Accounts ==========

    /// Returns an account number not currently in use.
    ///
    /// Draws up to `account_number_max_attempts` candidates and checks each
    /// against the store.
    ///
    /// # Errors
    ///
    /// `AccountNumberExhausted` or `Durability`.
    pub async fn generate_account_number(&self) -> Result<AccountNumber, LedgerError> {
        let max = self.max_attempts();
        for attempt in 1..=max {
            if let Some(candidate) = self.free_candidate(attempt).await? {
                return Ok(candidate);
            }
        }
        warn!(attempts = max, "No free account number found");
        Err(LedgerError::AccountNumberExhausted { attempts: max })
    }

    /// Draws one candidate and returns it if no account uses it yet.
    async fn free_candidate(&self, attempt: u32) -> Result<Option<AccountNumber>, LedgerError> {
        let candidate = self.generator.candidate();
        if self.ledger.account_number_exists(&candidate).await? {
            debug!(attempt, candidate = %candidate, "Account number collision");
            return Ok(None);
        }
        Ok(Some(candidate))
    }

    /// Opens an account for a member and records the opening deposit.
    ///
    /// The account row and its `DEPOSIT` record are written in one unit of
    /// work. Each of the `account_number_max_attempts` attempts draws one
    /// candidate number; a candidate that is already taken, or that another
    /// opening claims first, uses up that attempt.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` or `BelowMinimumOpeningBalance`
    /// - `MemberNotFound`
    /// - `AccountNumberExhausted` or `Durability`
    pub async fn open_account(
        &self,
        member_id: MemberId,
        initial_balance: Decimal,
    ) -> Result<Account, LedgerError> {
        let opening = validate_opening_balance(initial_balance, self.config.minimum_opening_balance)?;
        if self.members.find_member(member_id).await?.is_none() {
            return Err(LedgerError::MemberNotFound(member_id));
        }

        let max = self.max_attempts();
        for attempt in 1..=max {
            let Some(number) = self.free_candidate(attempt).await? else {
                continue;
            };
            let account = Account::open(number, member_id, opening);
            match self.persist_new_account(&account).await {
                Ok(()) => {
                    info!(
                        account_number = %account.account_number,
                        member_id = %member_id,
                        opening_balance = %opening,
                        "Account opened"
                    );
                    return Ok(account);
                }
                Err(StoreError::Conflict(detail)) => {
                    debug!(attempt, detail = %detail, "Account number taken concurrently, retrying");
                }
                Err(e) => {
                    error!(error = %e, "Failed to open account");
                    return Err(LedgerError::Durability(e));
                }
            }
        }
        warn!(attempts = max, member_id = %member_id, "No free account number found");
        Err(LedgerError::AccountNumberExhausted { attempts: max })
    }

    async fn persist_new_account(&self, account: &Account) -> Result<(), StoreError> {
        let opening = Transaction::deposit(
            account.account_number.clone(),
            account.balance(),
            Some(OPENING_DEPOSIT_DESCRIPTION.to_string()),
        );

        let mut uow = self.ledger.begin().await?;
        let staged = async {
            uow.insert_account(account).await?;
            uow.insert_transaction(&opening).await
        }
        .await;

        match staged {
            Ok(()) => uow.commit().await,
            Err(e) => {
                if let Err(rollback) = uow.rollback().await {
                    warn!(error = %rollback, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Looks up an account by number.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` or `Durability`.
    pub async fn account(&self, number: &str) -> Result<Account, LedgerError> {
        let Ok(parsed) = AccountNumber::parse(number) else {
            return Err(LedgerError::AccountNotFound(number.to_string()));
        };
        self.ledger
            .find_account_by_number(&parsed)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(number.to_string()))
    }

    /// Lists every account.
    ///
    /// # Errors
    ///
    /// `Durability`.
    pub async fn accounts(&self) -> Result<Vec<Account>, LedgerError> {
        Ok(self.ledger.list_accounts().await?)
    }

    /// Lists the accounts owned by a member.
    ///
    /// # Errors
    ///
    /// `MemberNotFound` or `Durability`.
    pub async fn member_accounts(&self, member_id: MemberId) -> Result<Vec<Account>, LedgerError> {
        self.member(member_id).await?;
        Ok(self.ledger.list_accounts_by_member(member_id).await?)
    }

    /// Number of accounts.
    ///
    /// # Errors
    ///
    /// `Durability`.
    pub async fn account_count(&self) -> Result<u64, LedgerError> {
        Ok(self.ledger.count_accounts().await?)
    }

    /// Sum of balances over active accounts.
    ///
    /// # Errors
    ///
    /// `Durability`.
    pub async fn total_balance(&self) -> Result<Decimal, LedgerError> {
        Ok(self.ledger.total_active_balance().await?)
    }

    // ========== Movements ==========

    /// See [`TransferCoordinator::transfer`].
    ///
    /// # Errors
    ///
    /// As for the coordinator.
    pub async fn transfer(&self, request: TransferRequest) -> Result<Transaction, LedgerError> {
        self.coordinator.transfer(request).await
    }

    /// See [`TransferCoordinator::deposit`].
    ///
    /// # Errors
    ///
    /// As for the coordinator.
    pub async fn deposit(&self, request: DepositRequest) -> Result<Transaction, LedgerError> {
        self.coordinator.deposit(request).await
    }

    /// See [`TransferCoordinator::withdraw`].
    ///
    /// # Errors
    ///
    /// As for the coordinator.
    pub async fn withdraw(&self, request: WithdrawalRequest) -> Result<Transaction, LedgerError> {
        self.coordinator.withdraw(request).await
    }

    // ========== Transactions ==========

    /// Looks up a transaction record.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound` or `Durability`.
    pub async fn transaction(&self, id: TransactionId) -> Result<Transaction, LedgerError> {
        self.ledger
            .find_transaction(id)
            .await?
            .ok_or(LedgerError::TransactionNotFound(id))
    }

    /// Number of transaction records.
    ///
    /// # Errors
    ///
    /// `Durability`.
    pub async fn transaction_count(&self) -> Result<u64, LedgerError> {
        Ok(self.ledger.count_transactions().await?)
    }

    /// One page of an account's history, most recent first.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` or `Durability`.
    pub async fn account_history(
        &self,
        number: &str,
        page: PageRequest,
    ) -> Result<PageResponse<Transaction>, LedgerError> {
        let account = self.account(number).await?;
        Ok(self
            .ledger
            .find_transactions_by_account(&account.account_number, page.normalized())
            .await?)
    }

    // ========== Members ==========

    /// Registers a new member.
    ///
    /// # Errors
    ///
    /// `InvalidMember`, `DuplicateEmail`, or `Durability`.
    pub async fn register_member(&self, input: NewMember) -> Result<Member, LedgerError> {
        if let Some(message) = input.validation_message() {
            return Err(LedgerError::InvalidMember(message));
        }

        let member = input.into_member();
        if self.members.find_member_by_email(&member.email).await?.is_some() {
            return Err(LedgerError::DuplicateEmail(member.email));
        }

        match self.members.create_member(&member).await {
            Ok(()) => {
                info!(member_id = %member.id, "Member registered");
                Ok(member)
            }
            Err(StoreError::Conflict(_)) => Err(LedgerError::DuplicateEmail(member.email)),
            Err(e) => Err(LedgerError::Durability(e)),
        }
    }

    /// Looks up a member.
    ///
    /// # Errors
    ///
    /// `MemberNotFound` or `Durability`.
    pub async fn member(&self, id: MemberId) -> Result<Member, LedgerError> {
        self.members
            .find_member(id)
            .await?
            .ok_or(LedgerError::MemberNotFound(id))
    }

    /// Lists every member.
    ///
    /// # Errors
    ///
    /// `Durability`.
    pub async fn members(&self) -> Result<Vec<Member>, LedgerError> {
        Ok(self.members.list_members().await?)
    }

    /// Number of members.
    ///
    /// # Errors
    ///
    /// `Durability`.
    pub async fn member_count(&self) -> Result<u64, LedgerError> {
        Ok(self.members.count_members().await?)
    }
}
