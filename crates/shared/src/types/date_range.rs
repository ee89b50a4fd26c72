//! Inclusive date range for report periods.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An inclusive date range (`start..=end`).
///
/// Both bounds are ledger dates, not timestamps. The range itself carries no
/// validity guarantee; callers validate ordering and future bounds against
/// their own error taxonomy before use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range (inclusive).
    pub start: NaiveDate,
    /// Last day of the range (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new range without validating ordering.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Returns true if `start <= end`.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    /// Returns true if `date` falls within the range (inclusive).
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered by the range, inclusive of both bounds.
    ///
    /// Returns 0 for an unordered range.
    #[must_use]
    pub fn days(&self) -> i64 {
        if self.is_ordered() {
            (self.end - self.start).num_days() + 1
        } else {
            0
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}
