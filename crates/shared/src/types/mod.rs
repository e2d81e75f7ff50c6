//! Common types used across the application.

pub mod id;
pub mod pagination;

pub use id::{AccountId, IdParseError, MemberId, TransactionId};
pub use pagination::{PageMeta, PageRequest, PageResponse};
