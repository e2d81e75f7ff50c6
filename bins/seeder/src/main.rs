//! Demo data seeder for Moneta development.
//!
//! Registers a few members, opens accounts for them and runs one transfer,
//! all through `BankService` so every ledger rule applies. Members that
//! already exist (by email) are skipped.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use moneta_core::{BankService, LedgerError, Member, NewMember, TransferRequest};
use moneta_db::{PgLedgerStore, PgMemberStore};
use moneta_shared::AppConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Demo members: (name, email, phone, opening balances).
const DEMO_MEMBERS: &[(&str, &str, &str, &[Decimal])] = &[
    (
        "Alya Pratama",
        "alya@moneta.dev",
        "+62 811 1000 0001",
        &[dec!(100000.00), dec!(2500.00)],
    ),
    (
        "Bima Santoso",
        "bima@moneta.dev",
        "+62 811 1000 0002",
        &[dec!(50000.00)],
    ),
    (
        "Citra Lestari",
        "citra@moneta.dev",
        "+62 811 1000 0003",
        &[dec!(1000.00)],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    anyhow::ensure!(
        !config.database.is_in_memory(),
        "seeding needs a real database.url"
    );

    println!("Connecting to database...");
    let db = moneta_db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let bank = BankService::new(
        Arc::new(PgLedgerStore::new(db.clone())),
        Arc::new(PgMemberStore::new(db)),
        config.ledger,
    );

    let mut opened = Vec::new();
    for (name, email, phone, balances) in DEMO_MEMBERS {
        println!("Seeding member {email}...");
        let Some(member) = seed_member(&bank, name, email, phone).await? else {
            println!("  Already exists, skipping...");
            continue;
        };
        for balance in *balances {
            let account = bank.open_account(member.id, *balance).await?;
            println!("  Opened {} with {}", account.account_number, account.balance());
            opened.push(account);
        }
    }

    if let [first, second, ..] = opened.as_slice() {
        let tx = bank
            .transfer(TransferRequest {
                from_account_number: first.account_number.to_string(),
                to_account_number: second.account_number.to_string(),
                amount: dec!(1250.00),
                description: Some("Seed transfer".to_string()),
            })
            .await?;
        println!("Recorded transfer {}", tx.id);
    }

    println!("Seeding complete!");
    Ok(())
}

/// Registers a member, returning `None` if the email is already taken.
async fn seed_member(
    bank: &BankService,
    name: &str,
    email: &str,
    phone: &str,
) -> Result<Option<Member>, LedgerError> {
    let input = NewMember {
        name: name.to_string(),
        email: email.to_string(),
        phone_number: phone.to_string(),
    };
    match bank.register_member(input).await {
        Ok(member) => Ok(Some(member)),
        Err(LedgerError::DuplicateEmail(_)) => Ok(None),
        Err(e) => Err(e),
    }
}
