//! Balance summary computation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use loomledger_shared::{DateRange, EngineConfig, config::SummaryConfig};

use crate::chart::AccountCategory;
use crate::ledger::LedgerReader;
use crate::trial_balance::{
    CalculationOptions, SnapshotStore, TrialBalanceCalculator, TrialBalanceError,
};

use super::types::{BalanceSummary, KeyAccount};

/// Projects a trial balance into the headline figures the dashboard shows.
///
/// Reuses the calculator and therefore all its caching; a summary request
/// never touches ledger data that a cached trial balance already covers.
pub struct BalanceSummaryService<'a, R, S> {
    calculator: &'a TrialBalanceCalculator<R, S>,
    epoch: NaiveDate,
    config: SummaryConfig,
}

impl<R, S> std::fmt::Debug for BalanceSummaryService<'_, R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BalanceSummaryService")
            .field("epoch", &self.epoch)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAccountKind {
    Bank,
    Cash,
}

impl<'a, R, S> BalanceSummaryService<'a, R, S>
where
    R: LedgerReader,
    S: SnapshotStore,
{
    /// Creates a service over the given calculator.
    #[must_use]
    pub fn new(calculator: &'a TrialBalanceCalculator<R, S>, config: &EngineConfig) -> Self {
        Self {
            calculator,
            epoch: config.ledger.epoch,
            config: config.summary.clone(),
        }
    }

    /// Summarizes the company position as of `as_of`, covering all postings
    /// from the ledger epoch.
    ///
    /// # Errors
    ///
    /// Propagates any trial balance calculation error.
    pub async fn summarize(&self, as_of: NaiveDate) -> Result<BalanceSummary, TrialBalanceError> {
        let range = DateRange::new(self.epoch, as_of);
        let outcome = self
            .calculator
            .calculate(range, &CalculationOptions::default())
            .await?;
        let data = &outcome.snapshot;

        let natural = |category: AccountCategory| {
            category
                .normal_balance()
                .natural(data.category_subtotal(category))
        };

        let total_assets = natural(AccountCategory::Assets);
        let total_liabilities = natural(AccountCategory::Liabilities);
        let total_equity = natural(AccountCategory::Equity);
        let total_revenue = natural(AccountCategory::Income);
        let total_expenses = natural(AccountCategory::Expenses);

        let mut bank_balance = Decimal::ZERO;
        let mut cash_on_hand = Decimal::ZERO;
        let mut key_accounts = Vec::new();

        for group in &data.categories {
            if group.category != AccountCategory::Assets {
                continue;
            }
            for account in &group.accounts {
                let Some(kind) = self.classify(&account.account_code, &account.account_name)
                else {
                    continue;
                };
                let balance = AccountCategory::Assets
                    .normal_balance()
                    .natural(account.net_balance);
                match kind {
                    KeyAccountKind::Bank => bank_balance += balance,
                    KeyAccountKind::Cash => cash_on_hand += balance,
                }
                key_accounts.push(KeyAccount {
                    account_id: account.account_id,
                    account_code: account.account_code.clone(),
                    account_name: account.account_name.clone(),
                    category: account.category,
                    balance,
                });
            }
        }

        debug!(%as_of, %bank_balance, %cash_on_hand, "balance summary projected");

        Ok(BalanceSummary {
            bank_balance,
            cash_on_hand,
            total_assets,
            total_liabilities,
            total_equity,
            total_revenue,
            total_expenses,
            net_income: total_revenue - total_expenses,
            key_accounts,
            is_from_cache: outcome.from_cache,
            last_updated: data.generated_at,
        })
    }

    /// Bank/cash classification: code prefixes first, account-name fallback
    /// for charts that do not follow the numbering scheme.
    fn classify(&self, code: &str, name: &str) -> Option<KeyAccountKind> {
        if self
            .config
            .bank_code_prefixes
            .iter()
            .any(|p| code.starts_with(p.as_str()))
        {
            return Some(KeyAccountKind::Bank);
        }
        if self
            .config
            .cash_code_prefixes
            .iter()
            .any(|p| code.starts_with(p.as_str()))
        {
            return Some(KeyAccountKind::Cash);
        }

        let lowered = name.to_lowercase();
        if lowered.contains("bank") {
            Some(KeyAccountKind::Bank)
        } else if lowered.contains("cash") {
            Some(KeyAccountKind::Cash)
        } else {
            None
        }
    }
}
