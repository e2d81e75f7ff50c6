//! Property-based tests for the balance primitives.
//!
//! - Balance never goes negative under any sequence of primitives
//! - Failed primitives leave the balance untouched
//! - Deposits followed by equal withdrawals restore the balance

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::account::Account;
use super::service::AccountLedger;
use crate::numbering::AccountNumber;
use moneta_shared::types::MemberId;

/// Strategy to generate positive amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

#[derive(Debug, Clone)]
enum Op {
    Deposit(Decimal),
    Withdraw(Decimal),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        positive_amount().prop_map(Op::Deposit),
        positive_amount().prop_map(Op::Withdraw),
    ]
}

fn account(balance: Decimal) -> Account {
    Account::open(
        AccountNumber::parse("3333000000000077").unwrap(),
        MemberId::new(),
        balance,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_balance_never_negative(
        opening in positive_amount(),
        ops in prop::collection::vec(op_strategy(), 0..50),
    ) {
        let mut acct = account(opening);
        let mut expected = acct.balance();

        for op in ops {
            let before = acct.balance();
            match op {
                Op::Deposit(amount) => {
                    prop_assert!(AccountLedger::deposit(&mut acct, amount).is_ok());
                    expected += amount;
                }
                Op::Withdraw(amount) => {
                    if AccountLedger::has_sufficient_funds(&acct, amount) {
                        prop_assert!(AccountLedger::withdraw(&mut acct, amount).is_ok());
                        expected -= amount;
                    } else {
                        prop_assert!(AccountLedger::withdraw(&mut acct, amount).is_err());
                        prop_assert_eq!(acct.balance(), before);
                    }
                }
            }
            prop_assert!(acct.balance() >= Decimal::ZERO);
            prop_assert_eq!(acct.balance(), expected);
        }
    }

    #[test]
    fn prop_deposit_then_withdraw_restores(opening in positive_amount(), amount in positive_amount()) {
        let mut acct = account(opening);
        AccountLedger::deposit(&mut acct, amount).unwrap();
        AccountLedger::withdraw(&mut acct, amount).unwrap();
        prop_assert_eq!(acct.balance(), opening);
    }

    #[test]
    fn prop_sufficient_funds_matches_comparison(balance in positive_amount(), amount in positive_amount()) {
        let acct = account(balance);
        prop_assert_eq!(AccountLedger::has_sufficient_funds(&acct, amount), balance >= amount);
    }
}
