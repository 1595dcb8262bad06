//! Calendar month value
//!
//! The ledger only ever reasons about whole months. A `Month` is a year and a
//! month number, ordered chronologically, and written as `JAN25`.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::MonthParseError;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Earliest month whose `JAN70` form parses back to itself
pub const FIRST_STORABLE: Month = Month {
    year: 1970,
    month: 1,
};

/// Latest month whose `DEC69` form parses back to itself
pub const LAST_STORABLE: Month = Month {
    year: 2069,
    month: 12,
};

/// A calendar month (year + month), normalized to its first day
///
/// Field order matters: the derived `Ord` compares year first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Build a month from a year and a 1-based month number
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing today's local date
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Move forward (or backward, for negative `months`) by whole months
    ///
    /// `None` when the result falls outside the representable years.
    pub fn shift(self, months: i64) -> Option<Self> {
        let index = (i64::from(self.year) * 12 + i64::from(self.month - 1)).checked_add(months)?;
        Some(Self {
            year: i32::try_from(index.div_euclid(12)).ok()?,
            month: index.rem_euclid(12) as u32 + 1,
        })
    }

    /// Whether the two-digit text form reads back as this same month
    pub fn is_storable(self) -> bool {
        (FIRST_STORABLE..=LAST_STORABLE).contains(&self)
    }

    /// Signed number of months from `self` to `later`
    pub fn months_until(self, later: Month) -> i64 {
        (i64::from(later.year) - i64::from(self.year)) * 12 + i64::from(later.month)
            - i64::from(self.month)
    }

    /// Full English month name, e.g. "October"
    pub fn long_name(&self) -> &'static str {
        chrono::Month::try_from(self.month as u8)
            .map(|m| m.name())
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:02}",
            MONTH_ABBREVIATIONS[(self.month - 1) as usize],
            self.year.rem_euclid(100)
        )
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    /// Parses `JAN25`-style values (case-insensitive, two-digit year)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 5 {
            return Err(MonthParseError(s.to_string()));
        }
        NaiveDate::parse_from_str(&format!("01{}", trimmed), "%d%b%y")
            .map(Self::from_date)
            .map_err(|_| MonthParseError(s.to_string()))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
