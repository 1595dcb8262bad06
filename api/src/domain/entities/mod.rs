//! Domain entities
//!
//! Pure ledger models: months, member records, their stored text form, and
//! dues.

pub mod due;
pub mod member;
pub mod month;
pub mod record_format;

pub use due::{compute_due, DueRoster, DueStatus};
pub use member::{MemberId, MemberRecord, MonthField};
pub use month::Month;
pub use record_format::{format_record, parse_record};
