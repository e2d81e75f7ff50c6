//! Money movements.
//!
//! # Modules
//!
//! - `types` - Request types and the `TransferStage` progression
//! - `coordinator` - Transfer, deposit and withdrawal orchestration

pub mod coordinator;
pub mod types;


pub use coordinator::TransferCoordinator;
pub use types::{DepositRequest, TransferRequest, TransferStage, WithdrawalRequest};
