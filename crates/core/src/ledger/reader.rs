//! Ledger reader contract and raw line types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use loomledger_shared::DateRange;

use crate::chart::AccountCategory;

/// Chart-of-accounts metadata for one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRef {
    /// The account ID.
    pub account_id: Uuid,
    /// Account code (numbering-scheme string, e.g. "1010").
    pub code: String,
    /// Account name.
    pub name: String,
    /// Canonical category classification, owned by the chart subsystem.
    pub category: AccountCategory,
}

/// One posted journal line, as read from the ledger store.
///
/// `amount` follows the signed convention: debits are negative, credits are
/// positive. Amounts are quantized to the money scale at this boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// The account this line posts to.
    pub account_id: Uuid,
    /// Category of the account, supplied with the line by the chart mapping.
    pub category: AccountCategory,
    /// Signed amount: negative for debits, positive for credits.
    pub amount: Decimal,
    /// Free-text description (journal entry particulars).
    pub description: String,
    /// The journal entry's transaction date.
    pub posted_on: NaiveDate,
}

impl JournalLine {
    /// Returns true if this line is a debit (negative amount).
    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.amount < Decimal::ZERO
    }
}

/// Errors from the underlying ledger store.
///
/// Surfaced, not retried, by the reader; retry policy belongs to callers.
#[derive(Debug, Clone, Error)]
pub enum LedgerReadError {
    /// The store could not be reached.
    #[error("ledger store unreachable: {0}")]
    Unreachable(String),

    /// The store returned malformed data.
    #[error("ledger store returned malformed data: {0}")]
    Malformed(String),
}

/// Read-only accessor over posted journal entries and chart metadata.
///
/// Implementations perform no caching and no business logic; one call maps to
/// one store round-trip. Both methods suspend on I/O.
pub trait LedgerReader: Send + Sync {
    /// Fetches chart-of-accounts metadata, optionally restricted to the given
    /// categories.
    fn fetch_accounts(
        &self,
        category_filter: Option<&[AccountCategory]>,
    ) -> impl Future<Output = Result<Vec<AccountRef>, LedgerReadError>> + Send;

    /// Fetches all posted lines whose transaction date falls within `range`,
    /// optionally restricted to accounts in the given categories.
    fn fetch_lines(
        &self,
        range: DateRange,
        category_filter: Option<&[AccountCategory]>,
    ) -> impl Future<Output = Result<Vec<JournalLine>, LedgerReadError>> + Send;
}
