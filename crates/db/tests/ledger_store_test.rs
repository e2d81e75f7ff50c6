//! Integration tests for the Postgres ledger store.
//!
//! These run the same money movements as the in-memory tests, but against
//! real row locks and database transactions.

#![allow(clippy::items_after_statements)]

mod common;

use futures::future::join_all;
use moneta_core::member::NewMember;
use moneta_core::{
    Account, BankService, LedgerError, LedgerStore, TransactionStatus, TransactionType,
    TransferRequest, WithdrawalRequest,
};
use moneta_db::PgLedgerStore;
use moneta_shared::types::PageRequest;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

async fn open_pair(bank: &BankService, a: Decimal, b: Decimal) -> (Account, Account) {
    let owner = bank
        .register_member(NewMember {
            name: "Integration Member".to_string(),
            email: common::unique_email("ledger"),
            phone_number: "+62 811 1111 1111".to_string(),
        })
        .await
        .unwrap();
    let first = bank.open_account(owner.id, a).await.unwrap();
    let second = bank.open_account(owner.id, b).await.unwrap();
    (first, second)
}

fn transfer(from: &Account, to: &Account, amount: Decimal) -> TransferRequest {
    TransferRequest {
        from_account_number: from.account_number.to_string(),
        to_account_number: to.account_number.to_string(),
        amount,
        description: None,
    }
}

async fn balance(bank: &BankService, account: &Account) -> Decimal {
    bank.account(account.account_number.as_str())
        .await
        .unwrap()
        .balance()
}

#[tokio::test]
async fn test_transfer_commits_balances_and_record() {
    let Some(db) = common::connect().await else {
        return;
    };
    let bank = common::bank(&db);
    let (a, b) = open_pair(&bank, dec!(100000.00), dec!(50000.00)).await;

    let tx = bank.transfer(transfer(&a, &b, dec!(10000.00))).await.unwrap();

    assert_eq!(balance(&bank, &a).await, dec!(90000.00));
    assert_eq!(balance(&bank, &b).await, dec!(60000.00));
    assert_eq!(tx.transaction_type, TransactionType::Transfer);
    assert_eq!(tx.status, TransactionStatus::Completed);

    let stored = bank.transaction(tx.id).await.unwrap();
    assert_eq!(stored.amount, dec!(10000.00));
    assert_eq!(stored.from_account, Some(a.account_number.clone()));
}

#[tokio::test]
async fn test_insufficient_balance_leaves_no_trace() {
    let Some(db) = common::connect().await else {
        return;
    };
    let bank = common::bank(&db);
    let (a, b) = open_pair(&bank, dec!(5000.00), dec!(1000.00)).await;

    let err = bank
        .transfer(transfer(&a, &b, dec!(10000.00)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LedgerError::InsufficientBalance { balance, .. } if balance == dec!(5000.00)
    ));

    assert_eq!(balance(&bank, &a).await, dec!(5000.00));
    assert_eq!(balance(&bank, &b).await, dec!(1000.00));
    let history = bank
        .account_history(a.account_number.as_str(), PageRequest::default())
        .await
        .unwrap();
    // Only the opening deposit.
    assert_eq!(history.meta.total, 1);
}

#[tokio::test]
async fn test_missing_and_same_account() {
    let Some(db) = common::connect().await else {
        return;
    };
    let bank = common::bank(&db);
    let (a, b) = open_pair(&bank, dec!(1000.00), dec!(1000.00)).await;

    let err = bank
        .transfer(TransferRequest {
            from_account_number: "0000000000000000".to_string(),
            to_account_number: b.account_number.to_string(),
            amount: dec!(1.00),
            description: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));

    let err = bank.transfer(transfer(&a, &a, dec!(1.00))).await.unwrap_err();
    assert!(matches!(err, LedgerError::SameAccountTransfer));
    assert_eq!(balance(&bank, &a).await, dec!(1000.00));
}

#[tokio::test]
async fn test_concurrent_transfers_single_winner() {
    let Some(db) = common::connect().await else {
        return;
    };
    let bank = common::bank(&db);
    let (a, b) = open_pair(&bank, dec!(100000.00), dec!(1000.00)).await;

    let handles = (0..2).map(|_| {
        let bank = bank.clone();
        let request = transfer(&a, &b, dec!(60000.00));
        tokio::spawn(async move { bank.transfer(request).await })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        results
            .iter()
            .any(|r| matches!(r, Err(LedgerError::InsufficientBalance { .. })))
    );
    assert_eq!(balance(&bank, &a).await, dec!(40000.00));
    assert_eq!(balance(&bank, &b).await, dec!(61000.00));
}

#[tokio::test]
async fn test_concurrent_withdrawals_floor() {
    let Some(db) = common::connect().await else {
        return;
    };
    let bank = common::bank(&db);
    let (a, _) = open_pair(&bank, dec!(1000.00), dec!(1000.00)).await;

    let handles = (0..12).map(|_| {
        let bank = bank.clone();
        let account = a.account_number.to_string();
        tokio::spawn(async move {
            bank.withdraw(WithdrawalRequest {
                account,
                amount: dec!(300.00),
                description: None,
            })
            .await
        })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 3);
    assert_eq!(balance(&bank, &a).await, dec!(100.00));
}

#[tokio::test]
async fn test_opposite_transfers_complete() {
    let Some(db) = common::connect().await else {
        return;
    };
    let bank = common::bank(&db);
    let (a, b) = open_pair(&bank, dec!(5000.00), dec!(5000.00)).await;

    let handles = (0..20).map(|i| {
        let bank = bank.clone();
        let request = if i % 2 == 0 {
            transfer(&a, &b, dec!(10.00))
        } else {
            transfer(&b, &a, dec!(10.00))
        };
        tokio::spawn(async move { bank.transfer(request).await })
    });
    for result in join_all(handles).await {
        result.unwrap().unwrap();
    }

    assert_eq!(balance(&bank, &a).await, dec!(5000.00));
    assert_eq!(balance(&bank, &b).await, dec!(5000.00));
}

#[tokio::test]
async fn test_dropped_unit_of_work_rolls_back() {
    let Some(db) = common::connect().await else {
        return;
    };
    let bank = common::bank(&db);
    let (a, _) = open_pair(&bank, dec!(1000.00), dec!(1000.00)).await;
    let store = PgLedgerStore::new(db.clone());

    {
        let mut uow = store.begin().await.unwrap();
        let mut locked = uow.lock_account(&a.account_number).await.unwrap().unwrap();
        moneta_core::AccountLedger::withdraw(&mut locked, dec!(500.00)).unwrap();
        uow.save_account(&locked).await.unwrap();
    }

    assert_eq!(balance(&bank, &a).await, dec!(1000.00));
}

#[tokio::test]
async fn test_deposit_history_has_null_source() {
    let Some(db) = common::connect().await else {
        return;
    };
    let bank = common::bank(&db);
    let (_, b) = open_pair(&bank, dec!(1000.00), dec!(1000.00)).await;

    let history = bank
        .account_history(b.account_number.as_str(), PageRequest::new(1, 5))
        .await
        .unwrap();
    assert!(
        history
            .data
            .iter()
            .any(|tx| tx.from_account.is_none() && tx.transaction_type == TransactionType::Deposit)
    );
}

#[tokio::test]
async fn test_concurrent_openings_unique_numbers() {
    let Some(db) = common::connect().await else {
        return;
    };
    let bank = common::bank(&db);
    let owner = bank
        .register_member(NewMember {
            name: "Many Accounts".to_string(),
            email: common::unique_email("openings"),
            phone_number: "+62 811 2222 2222".to_string(),
        })
        .await
        .unwrap();

    let handles = (0..16).map(|_| {
        let bank = bank.clone();
        tokio::spawn(async move { bank.open_account(owner.id, dec!(1000.00)).await })
    });
    let mut numbers: Vec<String> = join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap().account_number.to_string())
        .collect();
    numbers.sort();
    numbers.dedup();
    assert_eq!(numbers.len(), 16);
    assert_eq!(bank.member_accounts(owner.id).await.unwrap().len(), 16);
}
