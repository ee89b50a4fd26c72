//! Error types for trial balance calculation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use super::audit::Violation;

/// Errors that can occur during trial balance calculation.
///
/// Cache-layer failures are deliberately absent: they are absorbed inside the
/// calculator (degrading to an uncached calculation) and never surfaced.
#[derive(Debug, Clone, Error)]
pub enum TrialBalanceError {
    /// The requested range is not ordered (start after end).
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// The requested range extends into the future.
    #[error("Invalid date range: end {end} is after today {today}")]
    RangeInFuture {
        /// Requested end date.
        end: NaiveDate,
        /// The current ledger date.
        today: NaiveDate,
    },

    /// The requested account is not in the chart of accounts.
    #[error("Account {account_id} not found in chart of accounts")]
    UnknownAccount {
        /// The requested account ID.
        account_id: Uuid,
    },

    /// The ledger store could not be read (I/O failure or timeout).
    ///
    /// Surfaced after logging; retry, if any, belongs to the caller.
    #[error("Ledger data access failed: {0}")]
    DataAccess(String),

    /// The audit validator caught a debits/credits or subtotal mismatch.
    ///
    /// The offending snapshot is never cached and never returned as valid;
    /// this is a data-integrity incident, distinct from "no data in range".
    #[error("Trial balance inconsistency: off by {discrepancy}")]
    Inconsistency {
        /// Total absolute discrepancy across all violations.
        discrepancy: Decimal,
        /// The individual audit violations.
        violations: Vec<Violation>,
    },
}

impl TrialBalanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::RangeInFuture { .. } => "RANGE_IN_FUTURE",
            Self::UnknownAccount { .. } => "UNKNOWN_ACCOUNT",
            Self::DataAccess(_) => "DATA_ACCESS_ERROR",
            Self::Inconsistency { .. } => "TRIAL_BALANCE_INCONSISTENCY",
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Only transient I/O failures qualify; bad input and integrity
    /// violations will fail the same way on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DataAccess(_))
    }
}

/// Errors from a snapshot store round-trip.
///
/// Internal only: the calculator catches these, logs a warning, and proceeds
/// uncached. They must never make a calculation fail outright.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    /// The store is unreachable or rejected the operation.
    #[error("Snapshot store unavailable: {0}")]
    Unavailable(String),

    /// A stored entry could not be decoded.
    #[error("Snapshot entry corrupt: {0}")]
    Corrupt(String),
}
