//! Postgres implementations of the core store traits.
//!
//! Each unit of work is a database transaction. Accounts are locked with
//! `SELECT ... FOR UPDATE`, so row locks are held until commit or rollback.

mod convert;
pub mod ledger;
pub mod member;

pub use ledger::{PgLedgerStore, PgUnitOfWork};
pub use member::PgMemberStore;
