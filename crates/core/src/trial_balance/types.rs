//! Trial balance snapshot types and calculation options.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loomledger_shared::DateRange;

use crate::chart::AccountCategory;

/// One account's aggregated activity within the requested range.
///
/// Debit and credit legs are kept separate so reports can print classic
/// two-column trial balances; `net_balance` is always their sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: Uuid,
    /// Account code from the chart.
    pub account_code: String,
    /// Account name from the chart.
    pub account_name: String,
    /// Canonical category classification.
    pub category: AccountCategory,
    /// Human-readable category description, derived from name heuristics.
    pub category_description: String,
    /// Particulars from the most recent line in range, if any.
    pub particulars: String,
    /// Sum of the debit legs. Always zero or negative.
    pub debit_amount: Decimal,
    /// Sum of the credit legs. Always zero or positive.
    pub credit_amount: Decimal,
    /// `credit_amount + debit_amount`, under the signed convention.
    pub net_balance: Decimal,
    /// Number of journal lines aggregated into this balance.
    pub transaction_count: u32,
}

/// All account balances within one category, with the category subtotal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryBalances {
    /// The category.
    pub category: AccountCategory,
    /// Balances for each account in the category, sorted by account name.
    pub accounts: Vec<AccountBalance>,
    /// Sum of the member accounts' net balances.
    pub subtotal: Decimal,
}

impl CategoryBalances {
    /// An empty grouping for a category with no qualifying accounts.
    #[must_use]
    pub fn empty(category: AccountCategory) -> Self {
        Self {
            category,
            accounts: Vec::new(),
            subtotal: Decimal::ZERO,
        }
    }
}

/// A complete trial balance snapshot for one date range.
///
/// Immutable once produced; cached and shared by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceData {
    /// The range this snapshot covers.
    pub date_range: DateRange,
    /// Per-category balances in display order.
    pub categories: Vec<CategoryBalances>,
    /// Sum of all debit legs. Zero or negative.
    pub total_debits: Decimal,
    /// Sum of all credit legs. Zero or positive.
    pub total_credits: Decimal,
    /// `total_credits + total_debits`. Zero for a consistent ledger.
    pub final_balance: Decimal,
    /// Audit-trail rendering of the closing arithmetic,
    /// e.g. `"5500 + -1000 = 4500"`.
    pub calculation_expression: String,
    /// When this snapshot was computed.
    pub generated_at: DateTime<Utc>,
    /// Total journal lines aggregated across all accounts.
    pub total_transactions: u32,
}

impl TrialBalanceData {
    /// Assembles a snapshot from aggregated category balances, deriving the
    /// grand totals and the calculation expression.
    #[must_use]
    pub fn from_categories(date_range: DateRange, categories: Vec<CategoryBalances>) -> Self {
        let mut total_debits = Decimal::ZERO;
        let mut total_credits = Decimal::ZERO;
        let mut total_transactions: u32 = 0;

        for group in &categories {
            for account in &group.accounts {
                total_debits += account.debit_amount;
                total_credits += account.credit_amount;
                total_transactions += account.transaction_count;
            }
        }

        let final_balance = total_credits + total_debits;
        let calculation_expression = format!(
            "{} + {} = {}",
            total_credits.normalize(),
            total_debits.normalize(),
            final_balance.normalize()
        );

        Self {
            date_range,
            categories,
            total_debits,
            total_credits,
            final_balance,
            calculation_expression,
            generated_at: Utc::now(),
            total_transactions,
        }
    }

    /// Looks up the subtotal for a category, zero if the category is absent.
    #[must_use]
    pub fn category_subtotal(&self, category: AccountCategory) -> Decimal {
        self.categories
            .iter()
            .find(|g| g.category == category)
            .map_or(Decimal::ZERO, |g| g.subtotal)
    }

    /// Returns true if the final balance is exactly zero.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.final_balance == Decimal::ZERO
    }
}

/// One journal line in an account drill-down, with the balance after it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionEntry {
    /// The line's transaction date.
    pub posted_on: NaiveDate,
    /// Free-text particulars.
    pub description: String,
    /// Signed amount: negative for debits, positive for credits.
    pub amount: Decimal,
    /// Account balance after applying this line, under the signed convention.
    pub running_balance: Decimal,
}

/// Chronological activity of a single account within a range.
///
/// The drill-down behind one `AccountBalance` row: every line in date order
/// with a running balance, closing at the row's net balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountTransactions {
    /// The account ID.
    pub account_id: Uuid,
    /// Account code from the chart.
    pub account_code: String,
    /// Account name from the chart.
    pub account_name: String,
    /// Category classification.
    pub category: AccountCategory,
    /// The range the drill-down covers.
    pub date_range: DateRange,
    /// Lines in transaction-date order, each with its running balance.
    pub entries: Vec<TransactionEntry>,
    /// The running balance after the last entry, zero if there are none.
    pub closing_balance: Decimal,
}

/// Caller-tunable knobs for one calculation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationOptions {
    /// Present results grouped by category. Affects the cache key, not the
    /// snapshot shape; snapshots are always computed grouped.
    pub group_by_category: bool,
    /// Keep accounts with zero net balance and no activity in the output.
    pub include_zero_balances: bool,
    /// Restrict the calculation to these categories. `None` means all five.
    pub category_filter: Option<Vec<AccountCategory>>,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            group_by_category: true,
            include_zero_balances: false,
            category_filter: None,
        }
    }
}

/// The result of a calculation request: the snapshot plus cache provenance.
#[derive(Debug, Clone)]
pub struct CalculationOutcome {
    /// The (possibly shared) snapshot.
    pub snapshot: Arc<TrialBalanceData>,
    /// True when served from memoization or the snapshot store rather than
    /// computed from ledger data on this call.
    pub from_cache: bool,
}
