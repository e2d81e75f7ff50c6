//! Bank members and registration validation.

use chrono::{DateTime, Utc};
use moneta_shared::types::MemberId;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Lifecycle status of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    /// Member may open and use accounts.
    Active,
    /// Member has left the bank.
    Inactive,
}

impl MemberStatus {
    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Inactive => "INACTIVE",
        }
    }
}

/// A registered bank member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier.
    pub id: MemberId,
    /// Full name.
    pub name: String,
    /// Contact email, unique across members (stored lowercase).
    pub email: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Lifecycle status.
    pub status: MemberStatus,
    /// Registration time.
    pub created_at: DateTime<Utc>,
    /// Last profile change.
    pub updated_at: DateTime<Utc>,
}

/// Registration input for a new member.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMember {
    /// Full name.
    #[validate(length(max = 100), custom(function = "not_blank"))]
    pub name: String,
    /// Contact email.
    #[validate(email)]
    pub email: String,
    /// Contact phone number.
    #[validate(length(max = 32), custom(function = "not_blank"))]
    pub phone_number: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl NewMember {
    /// Returns a short description of every failed field, e.g. `"email, name"`.
    #[must_use]
    pub fn validation_message(&self) -> Option<String> {
        let errors = self.validate().err()?;
        let mut fields: Vec<String> = errors.field_errors().keys().map(ToString::to_string).collect();
        fields.sort_unstable();
        Some(format!("invalid fields: {}", fields.join(", ")))
    }

    /// Builds an active member from validated input.
    #[must_use]
    pub fn into_member(self) -> Member {
        let now = Utc::now();
        Member {
            id: MemberId::new(),
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone_number: self.phone_number.trim().to_string(),
            status: MemberStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}
