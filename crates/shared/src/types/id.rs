//! Typed IDs for entity references.
//!
//! A `MemberId` cannot be passed where a `TransactionId` is expected, and a
//! failed parse names the kind of id that was expected.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A string that is not a UUID for the named entity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {entity} id")]
pub struct IdParseError {
    /// Entity name, e.g. `member`.
    pub entity: &'static str,
    /// The rejected input.
    pub value: String,
}

macro_rules! typed_id {
    ($name:ident, $entity:literal, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Entity name used in parse errors and logs.
            pub const ENTITY: &'static str = $entity;

            /// Mints a time-ordered (v7) id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps a UUID read back from storage.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self).map_err(|_| IdParseError {
                    entity: $entity,
                    value: s.to_string(),
                })
            }
        }
    };
}

typed_id!(MemberId, "member", "Unique identifier for a bank member.");
typed_id!(AccountId, "account", "Internal identifier for a deposit account.");
typed_id!(TransactionId, "transaction", "Unique identifier for a transaction record.");
