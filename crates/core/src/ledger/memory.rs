//! In-memory ledger for tests and embedded use.

use std::sync::RwLock;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use loomledger_shared::{DateRange, quantize};

use crate::chart::AccountCategory;

use super::reader::{AccountRef, JournalLine, LedgerReadError, LedgerReader};

/// An in-memory chart of accounts plus posted journal lines.
///
/// Implements `LedgerReader` over plain vectors. Posting here is a test
/// convenience; real postings are owned by the journal-entry subsystem.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    chart: RwLock<Vec<AccountRef>>,
    lines: RwLock<Vec<JournalLine>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an account to the chart and returns its generated ID.
    pub fn add_account(&self, code: &str, name: &str, category: AccountCategory) -> Uuid {
        let account_id = Uuid::new_v4();
        self.chart
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(AccountRef {
                account_id,
                code: code.to_string(),
                name: name.to_string(),
                category,
            });
        account_id
    }

    /// Posts a single signed line to an account.
    ///
    /// Debits are negative, credits are positive. The amount is quantized to
    /// the money scale, matching the ledger store's column precision.
    ///
    /// # Errors
    ///
    /// Returns `LedgerReadError::Malformed` if the account is not in the chart.
    pub fn post(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
        posted_on: NaiveDate,
    ) -> Result<(), LedgerReadError> {
        let category = self
            .chart
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .find(|a| a.account_id == account_id)
            .map(|a| a.category)
            .ok_or_else(|| {
                LedgerReadError::Malformed(format!("account {account_id} not in chart"))
            })?;

        self.lines
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(JournalLine {
                account_id,
                category,
                amount: quantize(amount),
                description: description.to_string(),
                posted_on,
            });
        Ok(())
    }

    /// Number of lines posted so far.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }
}

fn category_matches(category: AccountCategory, filter: Option<&[AccountCategory]>) -> bool {
    filter.is_none_or(|categories| categories.contains(&category))
}

impl LedgerReader for InMemoryLedger {
    async fn fetch_accounts(
        &self,
        category_filter: Option<&[AccountCategory]>,
    ) -> Result<Vec<AccountRef>, LedgerReadError> {
        let mut accounts: Vec<AccountRef> = self
            .chart
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|a| category_matches(a.category, category_filter))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(accounts)
    }

    async fn fetch_lines(
        &self,
        range: DateRange,
        category_filter: Option<&[AccountCategory]>,
    ) -> Result<Vec<JournalLine>, LedgerReadError> {
        Ok(self
            .lines
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .iter()
            .filter(|l| range.contains(l.posted_on) && category_matches(l.category, category_filter))
            .cloned()
            .collect())
    }
}
