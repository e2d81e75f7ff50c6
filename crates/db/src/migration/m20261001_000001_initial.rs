//! Initial schema: members, accounts, transactions.
//!
//! Balance and amount rules are repeated as CHECK constraints so the database
//! rejects anything the application layer lets through by mistake.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(MEMBERS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(IMMUTABLE_TRANSACTIONS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
            DROP TABLE IF EXISTS transactions CASCADE;
            DROP FUNCTION IF EXISTS prevent_transaction_mutation() CASCADE;
            DROP TABLE IF EXISTS accounts CASCADE;
            DROP TABLE IF EXISTS members CASCADE;
            ",
        )
        .await?;
        Ok(())
    }
}

const MEMBERS_SQL: &str = r"
CREATE TABLE members (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    email VARCHAR(255) NOT NULL,
    phone_number VARCHAR(32) NOT NULL,
    status VARCHAR(16) NOT NULL DEFAULT 'ACTIVE',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_members_email UNIQUE (email),
    CONSTRAINT chk_members_status CHECK (status IN ('ACTIVE', 'INACTIVE'))
);

CREATE INDEX idx_members_created ON members(created_at);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    account_number VARCHAR(16) NOT NULL,
    member_id UUID NOT NULL REFERENCES members(id),
    balance NUMERIC(19, 2) NOT NULL DEFAULT 0,
    status VARCHAR(16) NOT NULL DEFAULT 'ACTIVE',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_accounts_number UNIQUE (account_number),
    CONSTRAINT chk_accounts_number_format CHECK (account_number ~ '^[0-9]{16}$'),
    CONSTRAINT chk_accounts_balance_non_negative CHECK (balance >= 0),
    CONSTRAINT chk_accounts_status CHECK (status IN ('ACTIVE', 'INACTIVE'))
);

-- Member's accounts
CREATE INDEX idx_accounts_member ON accounts(member_id);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    from_account VARCHAR(16) REFERENCES accounts(account_number),
    to_account VARCHAR(16) NOT NULL REFERENCES accounts(account_number),
    amount NUMERIC(19, 2) NOT NULL,
    transaction_type VARCHAR(16) NOT NULL,
    status VARCHAR(16) NOT NULL DEFAULT 'COMPLETED',
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_transactions_amount_positive CHECK (amount > 0),
    CONSTRAINT chk_transactions_type CHECK (transaction_type IN ('TRANSFER', 'DEPOSIT', 'WITHDRAWAL')),
    CONSTRAINT chk_transactions_status CHECK (status IN ('COMPLETED', 'FAILED')),
    CONSTRAINT chk_transactions_deposit_source CHECK (
        transaction_type <> 'DEPOSIT' OR from_account IS NULL
    ),
    CONSTRAINT chk_transactions_transfer_source CHECK (
        transaction_type <> 'TRANSFER' OR (from_account IS NOT NULL AND from_account <> to_account)
    )
);

-- Account history, most recent first
CREATE INDEX idx_transactions_from ON transactions(from_account, created_at DESC);
CREATE INDEX idx_transactions_to ON transactions(to_account, created_at DESC);
";

const IMMUTABLE_TRANSACTIONS_SQL: &str = r"
CREATE OR REPLACE FUNCTION prevent_transaction_mutation()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'transactions are immutable';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_transactions_immutable
    BEFORE UPDATE OR DELETE ON transactions
    FOR EACH ROW
    EXECUTE FUNCTION prevent_transaction_mutation();
";
