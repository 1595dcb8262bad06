//! Domain layer
//!
//! Ledger rules with no I/O of their own.
//! - `entities`: Months, member records and dues
//! - `ports`: Trait definitions for the storage the ledger runs on

pub mod entities;
pub mod ports;
