//! Ledger configuration constants
//!
//! Fixed business rules of the club ledger.

/// Membership fee charged per calendar month, in whole currency units
pub const MONTHLY_FEE: u64 = 20;

/// Currency label used in reports and messages
pub const CURRENCY: &str = "INR";

/// Digits in the numeric part of a member ID (`RKSC0001`)
pub const MEMBER_ID_WIDTH: usize = 4;

/// Extension of stored member records
pub const RECORD_EXTENSION: &str = ".txt";

/// Prefix of member IDs unless configured otherwise
pub const DEFAULT_MEMBER_ID_PREFIX: &str = "RKSC";

/// Storage namespace holding member records unless configured otherwise
pub const DEFAULT_MEMBER_NAMESPACE: &str = "/members";

/// Longest accepted member name
pub const MAX_NAME_LENGTH: usize = 100;
