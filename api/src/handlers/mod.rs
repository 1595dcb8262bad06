//! HTTP handlers
//!
//! Axum request handlers for the ledger endpoints.

pub mod dues;
pub mod members;

pub use dues::{get_due_report, get_dues};
pub use members::{add_member, get_member, list_members, record_payment};
