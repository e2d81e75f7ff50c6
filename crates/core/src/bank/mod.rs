//! The service surface used by the HTTP layer.

pub mod service;


pub use service::BankService;
