//! Postgres member store.

use async_trait::async_trait;
use moneta_core::member::Member;
use moneta_core::{MemberStore, StoreError};
use moneta_shared::types::MemberId;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use super::convert::{member_from_model, store_error};
use crate::entities::members;

/// Member store backed by Postgres.
#[derive(Debug, Clone)]
pub struct PgMemberStore {
    db: DatabaseConnection,
}

impl PgMemberStore {
    /// Creates a new store over a connection pool.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberStore for PgMemberStore {
    async fn create_member(&self, member: &Member) -> Result<(), StoreError> {
        members::ActiveModel {
            id: Set(member.id.into_inner()),
            name: Set(member.name.clone()),
            email: Set(member.email.clone()),
            phone_number: Set(member.phone_number.clone()),
            status: Set(member.status.into()),
            created_at: Set(member.created_at.into()),
            updated_at: Set(member.updated_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;
        Ok(())
    }

    async fn find_member(&self, id: MemberId) -> Result<Option<Member>, StoreError> {
        Ok(members::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(member_from_model))
    }

    async fn find_member_by_email(&self, email: &str) -> Result<Option<Member>, StoreError> {
        Ok(members::Entity::find()
            .filter(members::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(member_from_model))
    }

    async fn list_members(&self) -> Result<Vec<Member>, StoreError> {
        Ok(members::Entity::find()
            .order_by_asc(members::Column::CreatedAt)
            .order_by_asc(members::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_error)?
            .into_iter()
            .map(member_from_model)
            .collect())
    }

    async fn count_members(&self) -> Result<u64, StoreError> {
        members::Entity::find()
            .count(&self.db)
            .await
            .map_err(store_error)
    }
}
