//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.

use crate::domain::entities::{MemberId, MemberRecord, Month, MonthField};

/// A month, panicking on an invalid month number
pub fn month(year: i32, month: u32) -> Month {
    Month::new(year, month).expect("valid month")
}

/// A freshly enrolled member
pub fn test_member(member_id: &str, name: &str) -> MemberRecord {
    MemberRecord::new(MemberId::from(member_id), name)
}

/// A member whose dues are paid through `valid_upto`
pub fn test_member_paid_through(member_id: &str, name: &str, valid_upto: Month) -> MemberRecord {
    MemberRecord {
        name: name.to_string(),
        member_id: MemberId::from(member_id),
        total_paid: 20,
        last_payment_month: MonthField::Month(valid_upto),
        valid_upto: MonthField::Month(valid_upto),
    }
}
