//! Immutable movement records.

use chrono::{DateTime, Utc};
use moneta_shared::types::TransactionId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numbering::AccountNumber;

/// Kind of money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Movement between two accounts.
    Transfer,
    /// Money entering an account from outside the bank.
    Deposit,
    /// Money leaving an account to outside the bank.
    Withdrawal,
}

impl TransactionType {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transfer => "TRANSFER",
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
        }
    }
}

/// Outcome recorded on a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Movement was applied.
    Completed,
    /// Movement was attempted and not applied.
    Failed,
}

impl TransactionStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

/// A record of one completed money movement.
///
/// Records are written once, in the same unit of work as the balance changes
/// they describe, and never updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Source account; `None` for deposits.
    pub from_account: Option<AccountNumber>,
    /// Destination account.
    pub to_account: AccountNumber,
    /// Amount moved, always positive.
    pub amount: Decimal,
    /// Kind of movement.
    pub transaction_type: TransactionType,
    /// Outcome.
    pub status: TransactionStatus,
    /// Free-form description supplied by the caller.
    pub description: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    fn completed(
        transaction_type: TransactionType,
        from_account: Option<AccountNumber>,
        to_account: AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            from_account,
            to_account,
            amount,
            transaction_type,
            status: TransactionStatus::Completed,
            description,
            created_at: Utc::now(),
        }
    }

    /// Record of a completed transfer.
    #[must_use]
    pub fn transfer(
        from: AccountNumber,
        to: AccountNumber,
        amount: Decimal,
        description: Option<String>,
    ) -> Self {
        Self::completed(TransactionType::Transfer, Some(from), to, amount, description)
    }

    /// Record of a completed deposit.
    #[must_use]
    pub fn deposit(to: AccountNumber, amount: Decimal, description: Option<String>) -> Self {
        Self::completed(TransactionType::Deposit, None, to, amount, description)
    }

    /// Record of a completed withdrawal. The account appears on both sides.
    #[must_use]
    pub fn withdrawal(account: AccountNumber, amount: Decimal, description: Option<String>) -> Self {
        Self::completed(
            TransactionType::Withdrawal,
            Some(account.clone()),
            account,
            amount,
            description,
        )
    }

    /// Returns true if the given account is the source or destination.
    #[must_use]
    pub fn involves(&self, number: &AccountNumber) -> bool {
        &self.to_account == number || self.from_account.as_ref() == Some(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn number(n: u64) -> AccountNumber {
        AccountNumber::parse(&format!("3333{n:012}")).unwrap()
    }

    #[test]
    fn test_transfer_record() {
        let tx = Transaction::transfer(number(1), number(2), dec!(10.00), Some("rent".into()));
        assert_eq!(tx.transaction_type, TransactionType::Transfer);
        assert_eq!(tx.status, TransactionStatus::Completed);
        assert_eq!(tx.from_account, Some(number(1)));
        assert_eq!(tx.to_account, number(2));
        assert!(tx.involves(&number(1)));
        assert!(tx.involves(&number(2)));
        assert!(!tx.involves(&number(3)));
    }

    #[test]
    fn test_deposit_has_no_source() {
        let tx = Transaction::deposit(number(5), dec!(1.00), None);
        assert_eq!(tx.transaction_type, TransactionType::Deposit);
        assert!(tx.from_account.is_none());
    }

    #[test]
    fn test_withdrawal_names_account_on_both_sides() {
        let tx = Transaction::withdrawal(number(7), dec!(3.00), None);
        assert_eq!(tx.from_account, Some(number(7)));
        assert_eq!(tx.to_account, number(7));
    }

    #[test]
    fn test_enum_strings() {
        assert_eq!(TransactionType::Withdrawal.as_str(), "WITHDRAWAL");
        assert_eq!(TransactionStatus::Failed.as_str(), "FAILED");
    }
}
