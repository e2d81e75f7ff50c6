//! Random account number candidates.

use rand::Rng;

use super::number::AccountNumber;

/// Exclusive upper bound of the random body (`10^12`).
const BODY_SPACE: u64 = 1_000_000_000_000;

/// Produces candidate account numbers.
///
/// The generator is pure: it never consults storage, so two candidates may
/// collide. Callers check existence and retry (see
/// [`crate::bank::BankService::open_account`]).
#[derive(Debug, Clone, Copy)]
pub struct AccountNumberGenerator {
    space: u64,
}

impl Default for AccountNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountNumberGenerator {
    /// Creates a generator over the full 12 digit body space.
    #[must_use]
    pub const fn new() -> Self {
        Self { space: BODY_SPACE }
    }

    /// Creates a generator whose body is drawn from `0..space`.
    ///
    /// `space` is clamped to `1..=10^12`. Small spaces force collisions.
    #[must_use]
    pub fn with_space(space: u64) -> Self {
        Self {
            space: space.clamp(1, BODY_SPACE),
        }
    }

    /// Returns a fresh candidate: `3333` followed by 12 random digits.
    #[must_use]
    pub fn candidate(&self) -> AccountNumber {
        let body = rand::rng().random_range(0..self.space);
        AccountNumber::from_body(body)
    }
}

impl Iterator for AccountNumberGenerator {
    type Item = AccountNumber;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.candidate())
    }
}
