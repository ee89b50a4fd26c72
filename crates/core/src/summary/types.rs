//! Balance summary value types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chart::AccountCategory;

/// One account surfaced individually on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyAccount {
    /// The account ID.
    pub account_id: Uuid,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Category classification.
    pub category: AccountCategory,
    /// Natural presentation balance (positive for a healthy balance on the
    /// account's normal side).
    pub balance: Decimal,
}

/// Company-wide position as of a date, in natural presentation balances.
///
/// Unlike the raw trial balance, every figure here is converted to the
/// category's normal side, so assets and expenses read positive when debits
/// exceed credits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Combined balance of bank accounts.
    pub bank_balance: Decimal,
    /// Combined balance of cash accounts.
    pub cash_on_hand: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Total income.
    pub total_revenue: Decimal,
    /// Total expenses.
    pub total_expenses: Decimal,
    /// `total_revenue - total_expenses`.
    pub net_income: Decimal,
    /// The individual bank and cash accounts behind the headline figures.
    pub key_accounts: Vec<KeyAccount>,
    /// True when the underlying trial balance came from a cache layer.
    pub is_from_cache: bool,
    /// When the underlying trial balance was generated.
    pub last_updated: DateTime<Utc>,
}
