//! Amount validation shared by every money movement.

use rust_decimal::Decimal;

use super::error::LedgerError;

/// Number of fractional digits carried by every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount or balance the ledger holds: `99999999999999999.99`,
/// the capacity of a `NUMERIC(19,2)` column.
pub const MAX_AMOUNT: Decimal =
    Decimal::from_parts(2_313_682_943, 2_328_306_436, 0, false, MONEY_SCALE);

/// Validates a movement amount and returns it at [`MONEY_SCALE`].
///
/// # Errors
///
/// Returns `InvalidAmount` if the amount is not strictly positive, exceeds
/// [`MAX_AMOUNT`] or carries more than two fractional digits.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, LedgerError> {
    if amount <= Decimal::ZERO || amount > MAX_AMOUNT {
        return Err(LedgerError::InvalidAmount(amount));
    }

    let normalized = amount.normalize();
    if normalized.scale() > MONEY_SCALE {
        return Err(LedgerError::InvalidAmount(amount));
    }

    let mut scaled = normalized;
    scaled.rescale(MONEY_SCALE);
    Ok(scaled)
}

/// Validates the initial balance of a new account.
///
/// # Errors
///
/// Returns `InvalidAmount` for malformed amounts and
/// `BelowMinimumOpeningBalance` when `amount < minimum`.
pub fn validate_opening_balance(amount: Decimal, minimum: Decimal) -> Result<Decimal, LedgerError> {
    let amount = validate_amount(amount)?;
    if amount < minimum {
        return Err(LedgerError::BelowMinimumOpeningBalance { minimum, amount });
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.01))]
    #[case(dec!(1))]
    #[case(dec!(10000.00))]
    #[case(dec!(5.500))]
    fn test_valid_amounts(#[case] amount: Decimal) {
        let scaled = validate_amount(amount).unwrap();
        assert_eq!(scaled, amount);
        assert_eq!(scaled.scale(), MONEY_SCALE);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(0.00))]
    #[case(dec!(-5.00))]
    #[case(dec!(0.001))]
    #[case(dec!(1.234))]
    fn test_invalid_amounts(#[case] amount: Decimal) {
        assert!(matches!(
            validate_amount(amount),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_max_amount_fills_numeric_column() {
        assert_eq!(MAX_AMOUNT, dec!(99999999999999999.99));
        assert_eq!(validate_amount(MAX_AMOUNT).unwrap(), MAX_AMOUNT);
    }

    #[rstest]
    #[case(dec!(100000000000000000.00))]
    #[case(dec!(792281625142643375935439503.00))]
    #[case(Decimal::MAX)]
    fn test_amounts_above_ceiling_rejected(#[case] amount: Decimal) {
        assert!(matches!(
            validate_amount(amount),
            Err(LedgerError::InvalidAmount(rejected)) if rejected == amount
        ));
    }

    #[test]
    fn test_opening_balance_minimum() {
        let minimum = dec!(1000.00);
        assert_eq!(
            validate_opening_balance(dec!(1000), minimum).unwrap(),
            dec!(1000.00)
        );
        assert!(matches!(
            validate_opening_balance(dec!(999.99), minimum),
            Err(LedgerError::BelowMinimumOpeningBalance { .. })
        ));
        assert!(matches!(
            validate_opening_balance(dec!(-1), minimum),
            Err(LedgerError::InvalidAmount(_))
        ));
    }
}
