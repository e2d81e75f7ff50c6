//! Ledger error types.
//!
//! Every failure of a ledger operation is a `LedgerError`. Callers branch on
//! [`LedgerError::kind`] rather than on individual variants.

use moneta_shared::AppError;
use moneta_shared::types::{MemberId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::store::StoreError;

/// Broad classification of ledger failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced entity does not exist.
    NotFound,
    /// The operation would break a balance invariant.
    InvariantViolation,
    /// The request itself is malformed.
    BadRequest,
    /// The request clashes with existing data.
    Conflict,
    /// The backing store could not persist the outcome.
    DurabilityFailure,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Not Found ==========
    /// No account with this number.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// No member with this id.
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    /// No transaction with this id.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    // ========== Invariant Violations ==========
    /// Withdrawal would take the balance below zero.
    #[error("Insufficient balance: available {balance}, requested {requested}")]
    InsufficientBalance {
        /// Balance at the time of the check.
        balance: Decimal,
        /// Amount the caller tried to move.
        requested: Decimal,
    },

    /// Deposit would take the balance above the ledger ceiling.
    #[error("Balance limit exceeded: balance {balance}, deposit {amount}")]
    BalanceLimitExceeded {
        /// Balance at the time of the check.
        balance: Decimal,
        /// Amount the caller tried to add.
        amount: Decimal,
    },

    // ========== Bad Requests ==========
    /// Amount is not positive, too large, or has more than two decimal places.
    #[error("Invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// Opening balance is under the configured minimum.
    #[error("Opening balance {amount} is below the minimum of {minimum}")]
    BelowMinimumOpeningBalance {
        /// Configured minimum.
        minimum: Decimal,
        /// Requested opening balance.
        amount: Decimal,
    },

    /// Source and destination are the same account.
    #[error("Cannot transfer to the same account")]
    SameAccountTransfer,

    /// Member registration data failed validation.
    #[error("Invalid member: {0}")]
    InvalidMember(String),

    // ========== Conflicts ==========
    /// Another member already uses this email.
    #[error("Email already registered: {0}")]
    DuplicateEmail(String),

    // ========== Durability ==========
    /// No unused account number was found within the attempt budget.
    #[error("Could not allocate an account number after {attempts} attempts")]
    AccountNumberExhausted {
        /// Attempts made.
        attempts: u32,
    },

    /// The store failed; nothing was applied.
    #[error("Operation could not be completed, please retry")]
    Durability(#[from] StoreError),
}

impl LedgerError {
    /// Returns the broad classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound(_) | Self::MemberNotFound(_) | Self::TransactionNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::InsufficientBalance { .. } | Self::BalanceLimitExceeded { .. } => {
                ErrorKind::InvariantViolation
            }
            Self::InvalidAmount(_)
            | Self::BelowMinimumOpeningBalance { .. }
            | Self::SameAccountTransfer
            | Self::InvalidMember(_) => ErrorKind::BadRequest,
            Self::DuplicateEmail(_) => ErrorKind::Conflict,
            Self::AccountNumberExhausted { .. } | Self::Durability(_) => {
                ErrorKind::DurabilityFailure
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::BalanceLimitExceeded { .. } => "BALANCE_LIMIT_EXCEEDED",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::BelowMinimumOpeningBalance { .. } => "BELOW_MINIMUM_OPENING_BALANCE",
            Self::SameAccountTransfer => "SAME_ACCOUNT_TRANSFER",
            Self::InvalidMember(_) => "INVALID_MEMBER",
            Self::DuplicateEmail(_) => "DUPLICATE_EMAIL",
            Self::AccountNumberExhausted { .. } => "ACCOUNT_NUMBER_EXHAUSTED",
            Self::Durability(_) => "DURABILITY_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::BadRequest => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Conflict => 409,
            ErrorKind::InvariantViolation => 422,
            ErrorKind::DurabilityFailure => 503,
        }
    }

    /// Returns true if the same request may succeed when retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::DurabilityFailure)
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::BadRequest => Self::Validation(message),
            ErrorKind::InvariantViolation => Self::BusinessRule(message),
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::DurabilityFailure => Self::ServiceUnavailable(message),
        }
    }
}
