//! Account number format and issuance.
//!
//! Account numbers are 16 digits: the fixed issuer prefix `3333` followed by
//! a 12 digit random body. Only [`crate::bank::BankService`] mints numbers,
//! so uniqueness is enforced in exactly one place.

pub mod generator;
pub mod number;

pub use generator::AccountNumberGenerator;
pub use number::{ACCOUNT_NUMBER_LEN, ACCOUNT_NUMBER_PREFIX, AccountNumber, AccountNumberError};
