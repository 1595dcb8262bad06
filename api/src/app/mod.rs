//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services coordinate between domain entities and the storage port.

pub mod fee_config;
pub mod ledger_service;
pub mod member_id_allocator;

pub use fee_config::MONTHLY_FEE;
pub use ledger_service::{LedgerService, LedgerSettings};
