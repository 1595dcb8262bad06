//! Plain-text rendering of API responses for the terminal

use crate::client::{AccountResponse, DueRoster, MemberSummary, PaymentResponse};

const CURRENCY: &str = "INR";

fn month_or_none(month: &Option<String>) -> &str {
    month.as_deref().unwrap_or("None")
}

pub fn payment(receipt: &PaymentResponse) -> String {
    format!(
        "{}\n{} ({}): {} {} for {} month(s), total paid {} {}, valid upto {}\n",
        receipt.message,
        receipt.name,
        receipt.member_id,
        CURRENCY,
        receipt.amount,
        receipt.months_credited,
        CURRENCY,
        receipt.total_paid,
        month_or_none(&receipt.valid_upto)
    )
}

pub fn members(members: &[MemberSummary]) -> String {
    if members.is_empty() {
        return "No members yet.\n".to_string();
    }
    members
        .iter()
        .map(|m| format!("{}  {}\n", m.member_id, m.name))
        .collect()
}

pub fn account(account: &AccountResponse) -> String {
    let mut buf = String::new();
    buf.push_str(&format!("Name:               {}\n", account.name));
    buf.push_str(&format!("Member ID:          {}\n", account.member_id));
    buf.push_str(&format!(
        "Total Paid:         {} {}\n",
        CURRENCY, account.total_paid
    ));
    buf.push_str(&format!(
        "Last Payment Month: {}\n",
        month_or_none(&account.last_payment_month)
    ));
    buf.push_str(&format!(
        "Valid Upto:         {}\n",
        month_or_none(&account.valid_upto)
    ));
    buf.push_str(&format!(
        "Dues as of {}:    {}",
        account.reference_month, account.due_period
    ));
    if account.has_dues {
        buf.push_str(&format!(
            " ({} month(s), {} {})",
            account.due_months, CURRENCY, account.due_amount
        ));
    }
    buf.push('\n');
    buf.push_str(&account.message);
    buf.push('\n');
    buf
}

pub fn dues(roster: &DueRoster) -> String {
    if roster.entries.is_empty() {
        return format!(
            "No dues as of {}. All members are up to date!\n",
            roster.reference_month
        );
    }

    let name_width = roster
        .entries
        .iter()
        .map(|e| e.name.chars().count())
        .chain(std::iter::once("TOTAL".len()))
        .max()
        .unwrap_or(0);

    let mut buf = format!("Dues as of {}\n", roster.reference_month);
    for entry in &roster.entries {
        let period = format!("{} - {}", entry.period.start_month, entry.period.end_month);
        buf.push_str(&format!(
            "{:<name_width$}  {:<9}  {:<13}  {:>3}  {} {}\n",
            entry.name,
            entry.member_id,
            period,
            entry.period.months_due,
            CURRENCY,
            entry.period.amount_due,
        ));
    }
    buf.push_str(&format!(
        "{:<name_width$}  {:<9}  {:<13}  {:>3}  {} {}\n",
        "TOTAL", "", "", roster.total.months_due, CURRENCY, roster.total.amount_due,
    ));
    buf
}
