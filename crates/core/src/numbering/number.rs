//! The `AccountNumber` value type.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Issuer prefix carried by every account number minted by this bank.
pub const ACCOUNT_NUMBER_PREFIX: &str = "3333";

/// Total number of digits in an account number.
pub const ACCOUNT_NUMBER_LEN: usize = 16;

/// Width of the random body that follows the prefix.
pub(crate) const BODY_LEN: usize = ACCOUNT_NUMBER_LEN - ACCOUNT_NUMBER_PREFIX.len();

/// Errors raised when parsing an account number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountNumberError {
    /// Wrong number of characters.
    #[error("account number must be {expected} digits, got {actual}")]
    Length {
        /// Required length.
        expected: usize,
        /// Length of the rejected input.
        actual: usize,
    },

    /// Contains something other than ASCII digits.
    #[error("account number must contain only digits")]
    NonDigit,
}

/// A validated, human-presentable account number.
///
/// Ordering is lexicographic, which for fixed-width digit strings is the
/// numeric order. Lock acquisition relies on this being a total order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

impl AccountNumber {
    /// Parses and validates an account number.
    ///
    /// Surrounding whitespace is ignored; anything else must be exactly
    /// [`ACCOUNT_NUMBER_LEN`] ASCII digits.
    pub fn parse(raw: &str) -> Result<Self, AccountNumberError> {
        let trimmed = raw.trim();
        if trimmed.len() != ACCOUNT_NUMBER_LEN {
            return Err(AccountNumberError::Length {
                expected: ACCOUNT_NUMBER_LEN,
                actual: trimmed.chars().count(),
            });
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AccountNumberError::NonDigit);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Builds a number from the issuer prefix and a numeric body.
    pub(crate) fn from_body(body: u64) -> Self {
        Self(format!("{ACCOUNT_NUMBER_PREFIX}{body:0width$}", width = BODY_LEN))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the number carries this bank's issuer prefix.
    #[must_use]
    pub fn has_issuer_prefix(&self) -> bool {
        self.0.starts_with(ACCOUNT_NUMBER_PREFIX)
    }
}

impl std::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AccountNumber {
    type Err = AccountNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountNumber {
    type Error = AccountNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountNumber> for String {
    fn from(number: AccountNumber) -> Self {
        number.0
    }
}

impl AsRef<str> for AccountNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
