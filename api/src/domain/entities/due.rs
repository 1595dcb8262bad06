//! Dues owed by members
//!
//! Computes what a member owes as of a reference month and aggregates the
//! result across the club into a roster with a total row.

use serde::Serialize;

use super::member::{MemberId, MemberRecord, MonthField};
use super::month::Month;

/// An unpaid stretch of months, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DuePeriod {
    pub start_month: Month,
    pub end_month: Month,
    pub months_due: u64,
    pub amount_due: u64,
}

impl DuePeriod {
    /// Text such as `DEC24 - MAR25`
    pub fn label(&self) -> String {
        format!("{} - {}", self.start_month, self.end_month)
    }
}

/// Whether a member owes anything as of a reference month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DueStatus {
    UpToDate,
    Owing(DuePeriod),
}

impl DueStatus {
    pub fn months_due(&self) -> u64 {
        match self {
            DueStatus::UpToDate => 0,
            DueStatus::Owing(period) => period.months_due,
        }
    }

    pub fn amount_due(&self) -> u64 {
        match self {
            DueStatus::UpToDate => 0,
            DueStatus::Owing(period) => period.amount_due,
        }
    }

    /// `DEC24 - MAR25`, or `No dues`
    pub fn period_label(&self) -> String {
        match self {
            DueStatus::UpToDate => "No dues".to_string(),
            DueStatus::Owing(period) => period.label(),
        }
    }
}

/// Dues for `record` as of `reference`, charging `monthly_fee` per month
pub fn compute_due(record: &MemberRecord, reference: Month, monthly_fee: u64) -> DueStatus {
    let start_month = match &record.valid_upto {
        MonthField::Unset => reference,
        MonthField::Malformed(raw) => {
            tracing::debug!(
                member_id = %record.member_id,
                valid_upto = %raw,
                "Unreadable Valid Upto, counting dues from the reference month"
            );
            reference
        }
        MonthField::Month(paid_through) if *paid_through >= reference => {
            return DueStatus::UpToDate;
        }
        MonthField::Month(paid_through) => match paid_through.shift(1) {
            Some(next) => next,
            None => return DueStatus::UpToDate,
        },
    };

    if start_month > reference {
        return DueStatus::UpToDate;
    }

    let months_due = (start_month.months_until(reference) + 1) as u64;
    DueStatus::Owing(DuePeriod {
        start_month,
        end_month: reference,
        months_due,
        amount_due: months_due.saturating_mul(monthly_fee),
    })
}

/// One member's line in the due roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueEntry {
    pub name: String,
    pub member_id: MemberId,
    pub period: DuePeriod,
}

/// The TOTAL trailer of a due roster
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DueTotals {
    pub months_due: u64,
    pub amount_due: u64,
}

/// Members with outstanding dues as of a reference month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueRoster {
    pub reference_month: Month,
    pub entries: Vec<DueEntry>,
    pub total: DueTotals,
}

impl DueRoster {
    /// Build the roster, ordered by member ID, skipping members with no dues
    pub fn build<'a>(
        records: impl IntoIterator<Item = &'a MemberRecord>,
        reference: Month,
        monthly_fee: u64,
    ) -> Self {
        let mut entries: Vec<DueEntry> = records
            .into_iter()
            .filter_map(|record| match compute_due(record, reference, monthly_fee) {
                DueStatus::UpToDate => None,
                DueStatus::Owing(period) => Some(DueEntry {
                    name: record.name.clone(),
                    member_id: record.member_id.clone(),
                    period,
                }),
            })
            .collect();
        entries.sort_by(|a, b| a.member_id.cmp(&b.member_id));

        let total = entries.iter().fold(DueTotals::default(), |acc, entry| DueTotals {
            months_due: acc.months_due + entry.period.months_due,
            amount_due: acc.amount_due + entry.period.amount_due,
        });

        Self {
            reference_month: reference,
            entries,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{month, test_member, test_member_paid_through};

    const FEE: u64 = 20;

    #[test]
    fn lapsed_member_owes_through_reference_month() {
        let member = test_member_paid_through("RKSC0001", "Asha", month(2024, 11));

        let status = compute_due(&member, month(2025, 3), FEE);

        let DueStatus::Owing(period) = status else {
            panic!("expected dues, got {:?}", status);
        };
        assert_eq!(period.start_month, month(2024, 12));
        assert_eq!(period.end_month, month(2025, 3));
        assert_eq!(period.months_due, 4);
        assert_eq!(period.amount_due, 80);
        assert_eq!(period.label(), "DEC24 - MAR25");
    }

    #[test]
    fn paid_through_reference_month_is_up_to_date() {
        let member = test_member_paid_through("RKSC0001", "Asha", month(2025, 3));
        assert_eq!(compute_due(&member, month(2025, 3), FEE), DueStatus::UpToDate);
    }

    #[test]
    fn paid_ahead_is_up_to_date() {
        let member = test_member_paid_through("RKSC0001", "Asha", month(2026, 1));
        assert_eq!(compute_due(&member, month(2025, 3), FEE), DueStatus::UpToDate);
    }

    #[test]
    fn never_paid_owes_reference_month_only() {
        let member = test_member("RKSC0001", "Asha");

        let status = compute_due(&member, month(2025, 3), FEE);

        assert_eq!(status.months_due(), 1);
        assert_eq!(status.amount_due(), 20);
        assert_eq!(status.period_label(), "MAR25 - MAR25");
    }

    #[test]
    fn malformed_valid_upto_owes_reference_month_only() {
        let mut member = test_member("RKSC0001", "Asha");
        member.valid_upto = MonthField::Malformed("??".to_string());

        let status = compute_due(&member, month(2025, 3), FEE);

        assert_eq!(status.months_due(), 1);
        assert_eq!(status.amount_due(), 20);
    }

    #[test]
    fn one_month_behind_owes_one_month() {
        let member = test_member_paid_through("RKSC0001", "Asha", month(2025, 2));

        let status = compute_due(&member, month(2025, 3), FEE);

        assert_eq!(status.months_due(), 1);
        assert_eq!(status.period_label(), "MAR25 - MAR25");
    }

    #[test]
    fn paid_through_last_storable_month_is_up_to_date() {
        let member = test_member_paid_through("RKSC0001", "Asha", month(2069, 12));

        assert_eq!(compute_due(&member, month(2025, 3), FEE), DueStatus::UpToDate);
        assert_eq!(compute_due(&member, month(2069, 12), FEE), DueStatus::UpToDate);
    }

    #[test]
    fn earliest_storable_month_owes_through_reference() {
        let member = test_member_paid_through("RKSC0001", "Asha", month(1970, 1));

        let status = compute_due(&member, month(1971, 1), FEE);

        assert_eq!(status.months_due(), 12);
        assert_eq!(status.period_label(), "FEB70 - JAN71");
    }

    #[test]
    fn up_to_date_label() {
        assert_eq!(DueStatus::UpToDate.period_label(), "No dues");
        assert_eq!(DueStatus::UpToDate.amount_due(), 0);
    }

    #[test]
    fn roster_skips_settled_members_and_totals_the_rest() {
        let reference = month(2025, 3);
        let members = vec![
            test_member_paid_through("RKSC0003", "Owes forty", month(2025, 1)),
            test_member_paid_through("RKSC0001", "Owes twenty", month(2025, 2)),
            test_member_paid_through("RKSC0002", "Settled", month(2025, 3)),
        ];

        let roster = DueRoster::build(&members, reference, FEE);

        assert_eq!(roster.entries.len(), 2);
        assert_eq!(roster.entries[0].member_id.as_str(), "RKSC0001");
        assert_eq!(roster.entries[0].period.amount_due, 20);
        assert_eq!(roster.entries[1].member_id.as_str(), "RKSC0003");
        assert_eq!(roster.entries[1].period.amount_due, 40);
        assert_eq!(
            roster.total,
            DueTotals {
                months_due: 3,
                amount_due: 60
            }
        );
    }

    #[test]
    fn empty_roster_when_everyone_paid() {
        let members = vec![test_member_paid_through("RKSC0001", "Asha", month(2025, 6))];

        let roster = DueRoster::build(&members, month(2025, 3), FEE);

        assert!(roster.is_empty());
        assert_eq!(roster.total, DueTotals::default());
    }

    #[test]
    fn roster_serializes_with_text_months() {
        let members = vec![test_member_paid_through("RKSC0001", "Asha", month(2024, 11))];

        let roster = DueRoster::build(&members, month(2025, 3), FEE);
        let json = serde_json::to_value(&roster).unwrap();

        assert_eq!(json["reference_month"], "MAR25");
        assert_eq!(json["entries"][0]["period"]["start_month"], "DEC24");
        assert_eq!(json["total"]["amount_due"], 80);
    }
}
