//! Due list renderer
//!
//! Renders a due roster as a markdown table with a TOTAL row.

use crate::app::fee_config::CURRENCY;
use crate::domain::entities::{DueRoster, Month};

const HEADERS: [&str; 5] = [
    "Name",
    "Member ID",
    "Due Period",
    "Due Months",
    "Due Amount",
];

/// Title date for a reference month, e.g. `01 March 2025`
fn title_date(month: Month) -> String {
    format!("01 {} {}", month.long_name(), month.year())
}

/// Download name for the due list of `reference`
pub fn report_file_name(reference: Month) -> String {
    format!(
        "duelist_01_{}_{}.md",
        reference.long_name(),
        reference.year()
    )
}

/// Render the due list for printing
pub fn render_due_list(club_name: &str, roster: &DueRoster) -> String {
    let mut buf = String::new();

    buf.push_str(&format!(
        "# {} - Due List ({})\n\n",
        club_name,
        title_date(roster.reference_month)
    ));

    if roster.is_empty() {
        buf.push_str("No dues. All members are up to date!\n");
        return buf;
    }

    buf.push_str(&format!(
        "| {} | {} | {} | {} | {} ({}) |\n",
        HEADERS[0], HEADERS[1], HEADERS[2], HEADERS[3], HEADERS[4], CURRENCY
    ));
    buf.push_str("|------|-----------|------------|-----------:|-----------------:|\n");

    for entry in &roster.entries {
        buf.push_str(&format!(
            "| {} | {} | {} | {} | {} {} |\n",
            escape_cell(&entry.name),
            entry.member_id,
            entry.period.label(),
            entry.period.months_due,
            CURRENCY,
            entry.period.amount_due
        ));
    }

    buf.push_str(&format!(
        "| **TOTAL** | | | **{}** | **{} {}** |\n",
        roster.total.months_due, CURRENCY, roster.total.amount_due
    ));

    buf
}

/// Keep user text from breaking the table
fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
