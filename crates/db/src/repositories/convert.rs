//! Row and error conversions between `SeaORM` and the core types.

use chrono::Utc;
use moneta_core::member::Member;
use moneta_core::{Account, AccountNumber, StoreError, Transaction};
use moneta_shared::types::{AccountId, MemberId, TransactionId};
use sea_orm::{DbErr, SqlErr};

use crate::entities::{accounts, members, transactions};

/// Maps a database error onto the store error taxonomy.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
        return StoreError::Conflict(detail);
    }
    match err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => StoreError::Unavailable(err.to_string()),
        other => StoreError::Backend(other.to_string()),
    }
}

fn parse_number(raw: &str) -> Result<AccountNumber, StoreError> {
    AccountNumber::parse(raw)
        .map_err(|e| StoreError::Backend(format!("stored account number {raw:?} is invalid: {e}")))
}

pub(crate) fn account_from_model(model: accounts::Model) -> Result<Account, StoreError> {
    Ok(Account::restore(
        AccountId::from_uuid(model.id),
        parse_number(&model.account_number)?,
        MemberId::from_uuid(model.member_id),
        model.balance,
        model.status.into(),
        model.created_at.with_timezone(&Utc),
        model.updated_at.with_timezone(&Utc),
    ))
}

pub(crate) fn transaction_from_model(model: transactions::Model) -> Result<Transaction, StoreError> {
    Ok(Transaction {
        id: TransactionId::from_uuid(model.id),
        from_account: model.from_account.as_deref().map(parse_number).transpose()?,
        to_account: parse_number(&model.to_account)?,
        amount: model.amount,
        transaction_type: model.transaction_type.into(),
        status: model.status.into(),
        description: model.description,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

pub(crate) fn member_from_model(model: members::Model) -> Member {
    Member {
        id: MemberId::from_uuid(model.id),
        name: model.name,
        email: model.email,
        phone_number: model.phone_number,
        status: model.status.into(),
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
