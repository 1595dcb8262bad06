//! Member record text format
//!
//! Records are stored as plain `Key: Value` lines:
//!
//! ```text
//! Name: Asha Rao
//! Member ID: RKSC0001
//! Total Paid: 60
//! Last Payment Month: MAR25
//! Valid Upto: MAY25
//! ```

use std::collections::HashMap;

use super::member::{MemberId, MemberRecord, MonthField};

pub const KEY_NAME: &str = "Name";
pub const KEY_MEMBER_ID: &str = "Member ID";
pub const KEY_TOTAL_PAID: &str = "Total Paid";
pub const KEY_LAST_PAYMENT_MONTH: &str = "Last Payment Month";
pub const KEY_VALID_UPTO: &str = "Valid Upto";

/// Render a record in fixed field order
pub fn format_record(record: &MemberRecord) -> String {
    format!(
        "{}: {}\n{}: {}\n{}: {}\n{}: {}\n{}: {}\n",
        KEY_NAME,
        record.name,
        KEY_MEMBER_ID,
        record.member_id,
        KEY_TOTAL_PAID,
        record.total_paid,
        KEY_LAST_PAYMENT_MONTH,
        record.last_payment_month,
        KEY_VALID_UPTO,
        record.valid_upto,
    )
}

/// Parse record text
///
/// Each line is split on its first colon; lines without one are skipped.
/// Returns the reason as `Err` when the text cannot be a member record.
pub fn parse_record(text: &str) -> Result<MemberRecord, String> {
    let fields: HashMap<&str, &str> = text
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect();

    let member_id = fields
        .get(KEY_MEMBER_ID)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| format!("missing '{}'", KEY_MEMBER_ID))?;

    let total_paid = match fields.get(KEY_TOTAL_PAID) {
        None => 0,
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| format!("'{}' is not a whole number: {}", KEY_TOTAL_PAID, raw))?,
    };

    Ok(MemberRecord {
        name: fields.get(KEY_NAME).copied().unwrap_or_default().to_string(),
        member_id: MemberId((*member_id).to_string()),
        total_paid,
        last_payment_month: fields
            .get(KEY_LAST_PAYMENT_MONTH)
            .map(|raw| MonthField::from_stored(raw))
            .unwrap_or_default(),
        valid_upto: fields
            .get(KEY_VALID_UPTO)
            .map(|raw| MonthField::from_stored(raw))
            .unwrap_or_default(),
    })
}
