//! Member domain entity
//!
//! One record per club member, plus the payment reconciliation rule that
//! turns an amount paid into months of coverage.

use std::fmt;

use serde::{Serialize, Serializer};

use super::month::{Month, LAST_STORABLE};
use crate::error::DomainError;

/// Human-facing member identifier, e.g. `RKSC0001`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    /// Format `prefix` + zero-padded `sequence`
    pub fn from_sequence(prefix: &str, sequence: u64, width: usize) -> Self {
        Self(format!("{}{:0width$}", prefix, sequence, width = width))
    }

    /// Parse the numeric suffix of an identifier carrying `prefix`
    pub fn sequence(&self, prefix: &str) -> Option<u64> {
        self.0.strip_prefix(prefix)?.parse().ok()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Text written for an unset month field
pub const UNSET_MONTH: &str = "None";

/// A stored month that may be unset or unreadable
///
/// `Malformed` keeps the stored text verbatim so a rewrite does not lose it
/// and the fallback rules can match on it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonthField {
    #[default]
    Unset,
    Month(Month),
    Malformed(String),
}

impl MonthField {
    /// Interpret stored text; never fails
    pub fn from_stored(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == UNSET_MONTH {
            return MonthField::Unset;
        }
        match raw.parse::<Month>() {
            Ok(month) => MonthField::Month(month),
            Err(_) => MonthField::Malformed(raw.to_string()),
        }
    }

}

impl From<Month> for MonthField {
    fn from(month: Month) -> Self {
        MonthField::Month(month)
    }
}

impl fmt::Display for MonthField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthField::Unset => write!(f, "{}", UNSET_MONTH),
            MonthField::Month(m) => write!(f, "{}", m),
            MonthField::Malformed(raw) => write!(f, "{}", raw),
        }
    }
}

impl Serialize for MonthField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MonthField::Unset => serializer.serialize_none(),
            other => serializer.collect_str(other),
        }
    }
}

/// A club member's ledger record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberRecord {
    pub name: String,
    pub member_id: MemberId,
    pub total_paid: u64,
    pub last_payment_month: MonthField,
    pub valid_upto: MonthField,
}

/// Result of applying one payment to a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOutcome {
    pub months_credited: u64,
    pub valid_upto: MonthField,
    pub total_paid: u64,
}

impl MemberRecord {
    /// A freshly enrolled member with nothing paid
    pub fn new(member_id: MemberId, name: &str) -> Self {
        Self {
            name: name.to_string(),
            member_id,
            total_paid: 0,
            last_payment_month: MonthField::Unset,
            valid_upto: MonthField::Unset,
        }
    }

    /// Credit `amount` paid during `current`, at `monthly_fee` per month
    ///
    /// Whole months only: any remainder is kept in `total_paid` but buys no
    /// coverage. A payment worth zero months leaves `valid_upto` untouched.
    /// Coverage that cannot be written back in the two-digit form is refused
    /// and the record is left as it was.
    pub fn apply_payment(
        &mut self,
        amount: u64,
        current: Month,
        monthly_fee: u64,
    ) -> Result<PaymentOutcome, DomainError> {
        if monthly_fee == 0 {
            return Err(DomainError::Validation(
                "Monthly fee must be positive".to_string(),
            ));
        }
        let total_paid = self.total_paid.checked_add(amount).ok_or_else(|| {
            DomainError::Validation(format!("Total paid overflows for {}", self.member_id))
        })?;

        let months_paid = amount / monthly_fee;
        let months = i64::try_from(months_paid).map_err(|_| {
            DomainError::Validation(format!("Payment of {} is too large", amount))
        })?;

        if !current.is_storable() {
            return Err(DomainError::Validation(format!(
                "Payment month {} cannot be recorded",
                current
            )));
        }

        let extended = match &self.valid_upto {
            _ if months == 0 => None,
            MonthField::Unset => Some(current.shift(months - 1)),
            MonthField::Month(paid_through) => Some(paid_through.shift(months)),
            MonthField::Malformed(raw) => {
                tracing::warn!(
                    member_id = %self.member_id,
                    valid_upto = %raw,
                    "Unreadable Valid Upto, crediting from the current month"
                );
                Some(current.shift(months - 1))
            }
        };

        let valid_upto = match extended {
            None => self.valid_upto.clone(),
            Some(Some(month)) if month.is_storable() => month.into(),
            Some(_) => {
                return Err(DomainError::Validation(format!(
                    "Payment of {} would extend membership past {}",
                    amount, LAST_STORABLE
                )));
            }
        };

        self.total_paid = total_paid;
        self.last_payment_month = current.into();
        self.valid_upto = valid_upto;

        Ok(PaymentOutcome {
            months_credited: months_paid,
            valid_upto: self.valid_upto.clone(),
            total_paid: self.total_paid,
        })
    }
}
