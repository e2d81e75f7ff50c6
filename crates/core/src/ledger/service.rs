//! Balance primitives.
//!
//! `AccountLedger` is the only code allowed to change an account balance.
//! Every primitive either applies in full or leaves the account untouched.

use rust_decimal::Decimal;

use super::account::Account;
use super::error::LedgerError;
use super::validation::{MAX_AMOUNT, validate_amount};

/// Stateless balance primitives over a single account.
pub struct AccountLedger;

impl AccountLedger {
    /// Adds `amount` to the account balance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` if the amount is not a positive two-place value
    /// and `BalanceLimitExceeded` when the new balance would pass
    /// [`MAX_AMOUNT`]. The account is unchanged on error.
    pub fn deposit(account: &mut Account, amount: Decimal) -> Result<(), LedgerError> {
        let amount = validate_amount(amount)?;
        let balance = account
            .balance()
            .checked_add(amount)
            .filter(|total| *total <= MAX_AMOUNT)
            .ok_or_else(|| LedgerError::BalanceLimitExceeded {
                balance: account.balance(),
                amount,
            })?;
        account.set_balance(balance);
        Ok(())
    }

    /// Removes `amount` from the account balance.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for malformed amounts and `InsufficientBalance`
    /// when the balance does not cover the amount. The account is unchanged
    /// on error.
    pub fn withdraw(account: &mut Account, amount: Decimal) -> Result<(), LedgerError> {
        let amount = validate_amount(amount)?;
        if !Self::has_sufficient_funds(account, amount) {
            return Err(LedgerError::InsufficientBalance {
                balance: account.balance(),
                requested: amount,
            });
        }
        account.set_balance(account.balance() - amount);
        Ok(())
    }

    /// Returns true if the balance covers `amount`.
    #[must_use]
    pub fn has_sufficient_funds(account: &Account, amount: Decimal) -> bool {
        account.balance() >= amount
    }
}
