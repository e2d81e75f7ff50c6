//! Movement requests and transfer stages.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a transfer.
///
/// The valid transitions are:
/// - Resolving → Validating (both accounts found and locked)
/// - Validating → Applying (distinct accounts, valid amount, funds available)
/// - Applying → Recording (balances changed and saved)
/// - Recording → Done (record stored and unit of work committed)
/// - Resolving | Validating | Applying → Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStage {
    /// Looking up and locking the two accounts.
    Resolving,
    /// Checking the request against the locked accounts.
    Validating,
    /// Moving the money.
    Applying,
    /// Storing the transaction record and committing.
    Recording,
    /// Committed.
    Done,
    /// Rolled back.
    Failed,
}

impl TransferStage {
    /// Returns the string representation of the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Resolving => "resolving",
            Self::Validating => "validating",
            Self::Applying => "applying",
            Self::Recording => "recording",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TransferStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Move money between two accounts.
///
/// The account number fields also accept their camelCase names.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    /// Source account number.
    #[serde(alias = "fromAccountNumber")]
    pub from_account_number: String,
    /// Destination account number.
    #[serde(alias = "toAccountNumber")]
    pub to_account_number: String,
    /// Amount to move.
    pub amount: Decimal,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Add money to one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Account number.
    pub account: String,
    /// Amount to add.
    pub amount: Decimal,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Take money out of one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Account number.
    pub account: String,
    /// Amount to remove.
    pub amount: Decimal,
    /// Optional free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Trims a description and drops it when empty.
pub(crate) fn clean_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clean_description() {
        assert_eq!(clean_description(None), None);
        assert_eq!(clean_description(Some("   ".into())), None);
        assert_eq!(
            clean_description(Some(" rent ".into())),
            Some("rent".to_string())
        );
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(TransferStage::Resolving.to_string(), "resolving");
        assert_eq!(TransferStage::Failed.as_str(), "failed");
    }

    #[test]
    fn test_transfer_request_field_names() {
        let snake: TransferRequest = serde_json::from_value(serde_json::json!({
            "from_account_number": "3333000000000001",
            "to_account_number": "3333000000000002",
            "amount": "10.00"
        }))
        .unwrap();
        assert_eq!(snake.from_account_number, "3333000000000001");
        assert_eq!(snake.to_account_number, "3333000000000002");
        assert_eq!(snake.amount, dec!(10.00));
        assert_eq!(snake.description, None);

        let camel: TransferRequest = serde_json::from_value(serde_json::json!({
            "fromAccountNumber": "3333000000000001",
            "toAccountNumber": "3333000000000002",
            "amount": "10.00",
            "description": "rent"
        }))
        .unwrap();
        assert_eq!(camel.from_account_number, "3333000000000001");
        assert_eq!(camel.to_account_number, "3333000000000002");
        assert_eq!(camel.description.as_deref(), Some("rent"));

        let out = serde_json::to_value(&camel).unwrap();
        assert_eq!(out["from_account_number"], "3333000000000001");
        assert_eq!(out["to_account_number"], "3333000000000002");
    }
}
