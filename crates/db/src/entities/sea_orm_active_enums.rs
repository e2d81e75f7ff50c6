//! String-backed enums stored in `VARCHAR` columns.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum MemberStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum AccountStatus {
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionType {
    #[sea_orm(string_value = "TRANSFER")]
    Transfer,
    #[sea_orm(string_value = "DEPOSIT")]
    Deposit,
    #[sea_orm(string_value = "WITHDRAWAL")]
    Withdrawal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TransactionStatus {
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

impl From<moneta_core::member::MemberStatus> for MemberStatus {
    fn from(status: moneta_core::member::MemberStatus) -> Self {
        match status {
            moneta_core::member::MemberStatus::Active => Self::Active,
            moneta_core::member::MemberStatus::Inactive => Self::Inactive,
        }
    }
}

impl From<MemberStatus> for moneta_core::member::MemberStatus {
    fn from(status: MemberStatus) -> Self {
        match status {
            MemberStatus::Active => Self::Active,
            MemberStatus::Inactive => Self::Inactive,
        }
    }
}

impl From<moneta_core::AccountStatus> for AccountStatus {
    fn from(status: moneta_core::AccountStatus) -> Self {
        match status {
            moneta_core::AccountStatus::Active => Self::Active,
            moneta_core::AccountStatus::Inactive => Self::Inactive,
        }
    }
}

impl From<AccountStatus> for moneta_core::AccountStatus {
    fn from(status: AccountStatus) -> Self {
        match status {
            AccountStatus::Active => Self::Active,
            AccountStatus::Inactive => Self::Inactive,
        }
    }
}

impl From<moneta_core::TransactionType> for TransactionType {
    fn from(kind: moneta_core::TransactionType) -> Self {
        match kind {
            moneta_core::TransactionType::Transfer => Self::Transfer,
            moneta_core::TransactionType::Deposit => Self::Deposit,
            moneta_core::TransactionType::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<TransactionType> for moneta_core::TransactionType {
    fn from(kind: TransactionType) -> Self {
        match kind {
            TransactionType::Transfer => Self::Transfer,
            TransactionType::Deposit => Self::Deposit,
            TransactionType::Withdrawal => Self::Withdrawal,
        }
    }
}

impl From<moneta_core::TransactionStatus> for TransactionStatus {
    fn from(status: moneta_core::TransactionStatus) -> Self {
        match status {
            moneta_core::TransactionStatus::Completed => Self::Completed,
            moneta_core::TransactionStatus::Failed => Self::Failed,
        }
    }
}

impl From<TransactionStatus> for moneta_core::TransactionStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Completed => Self::Completed,
            TransactionStatus::Failed => Self::Failed,
        }
    }
}
