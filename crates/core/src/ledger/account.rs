//! The account aggregate.

use chrono::{DateTime, Utc};
use moneta_shared::types::{AccountId, MemberId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::MONEY_SCALE;
use crate::numbering::AccountNumber;

/// Lifecycle status of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// Account is open for business.
    Active,
    /// Account has been closed. It is kept for history and never deleted.
    Inactive,
}

impl AccountStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A deposit account owned by a member.
///
/// The balance can only change through [`super::AccountLedger`]; outside this
/// module it is read with [`Account::balance`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    /// Internal identifier.
    pub id: AccountId,
    /// Public, unique account number.
    pub account_number: AccountNumber,
    /// Owning member.
    pub member_id: MemberId,
    balance: Decimal,
    /// Lifecycle status.
    pub status: AccountStatus,
    /// When the account was opened.
    pub created_at: DateTime<Utc>,
    /// Last balance or status change.
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new active account with the given opening balance.
    ///
    /// The opening balance must already have passed
    /// [`super::validate_opening_balance`].
    #[must_use]
    pub fn open(account_number: AccountNumber, member_id: MemberId, opening_balance: Decimal) -> Self {
        let now = Utc::now();
        let mut balance = opening_balance;
        balance.rescale(MONEY_SCALE);
        Self {
            id: AccountId::new(),
            account_number,
            member_id,
            balance,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds an account from a stored row.
    #[must_use]
    pub fn restore(
        id: AccountId,
        account_number: AccountNumber,
        member_id: MemberId,
        balance: Decimal,
        status: AccountStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            account_number,
            member_id,
            balance,
            status,
            created_at,
            updated_at,
        }
    }

    /// Current balance.
    #[must_use]
    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// Returns true if the account is active.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub(super) fn set_balance(&mut self, mut balance: Decimal) {
        balance.rescale(MONEY_SCALE);
        self.balance = balance;
        self.updated_at = Utc::now();
    }
}
