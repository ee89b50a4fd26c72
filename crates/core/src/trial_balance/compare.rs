//! Period-over-period trial balance comparison.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loomledger_shared::DateRange;

use crate::chart::AccountCategory;
use crate::ledger::LedgerReader;

use super::calculator::TrialBalanceCalculator;
use super::error::TrialBalanceError;
use super::store::SnapshotStore;
use super::types::{CalculationOptions, TrialBalanceData};

/// How one account's balance moved between the two periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeType {
    /// Active in period two only.
    New,
    /// Active in period one only.
    Removed,
    /// Net balance grew.
    Increased,
    /// Net balance shrank.
    Decreased,
    /// Identical in both periods.
    Unchanged,
}

/// One account's movement between the compared periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountVariance {
    /// The account ID.
    pub account_id: Uuid,
    /// Account name.
    pub account_name: String,
    /// Category classification.
    pub category: AccountCategory,
    /// Net balance in period one, zero if absent.
    pub period1_balance: Decimal,
    /// Net balance in period two, zero if absent.
    pub period2_balance: Decimal,
    /// `period2_balance - period1_balance`.
    pub absolute_change: Decimal,
    /// Percentage change relative to period one. `None` when the base is
    /// zero and the balance moved, since no finite percentage exists.
    pub percentage_change: Option<Decimal>,
    /// Direction classification of the movement.
    pub change_type: ChangeType,
}

/// A full two-period comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceComparison {
    /// The period-one snapshot.
    pub period1: TrialBalanceData,
    /// The period-two snapshot.
    pub period2: TrialBalanceData,
    /// Per-account variances, largest absolute movement first.
    pub variances: Vec<AccountVariance>,
    /// Sum of absolute changes across all accounts.
    pub total_variance: Decimal,
    /// When this comparison was produced.
    pub generated_at: DateTime<Utc>,
}

/// Compares the trial balances of two periods account by account.
///
/// Both snapshots come from the calculator, so comparisons share its cache
/// layers and its validation; comparing equal periods in either argument
/// order produces mirrored results.
#[derive(Debug)]
pub struct ComparisonEngine<'a, R, S> {
    calculator: &'a TrialBalanceCalculator<R, S>,
}

#[derive(Debug, Clone)]
struct Side {
    account_name: String,
    category: AccountCategory,
    balance: Decimal,
}

impl<'a, R, S> ComparisonEngine<'a, R, S>
where
    R: LedgerReader,
    S: SnapshotStore,
{
    /// Creates an engine over the given calculator.
    #[must_use]
    pub fn new(calculator: &'a TrialBalanceCalculator<R, S>) -> Self {
        Self { calculator }
    }

    /// Calculates both periods and derives the per-account variances.
    ///
    /// # Errors
    ///
    /// Fails with the first calculation error from either period.
    pub async fn compare(
        &self,
        period1: DateRange,
        period2: DateRange,
        options: &CalculationOptions,
    ) -> Result<TrialBalanceComparison, TrialBalanceError> {
        let first = self.calculator.calculate(period1, options).await?;
        let second = self.calculator.calculate(period2, options).await?;

        let variances = derive_variances(&first.snapshot, &second.snapshot);
        let total_variance = variances.iter().map(|v| v.absolute_change.abs()).sum();

        Ok(TrialBalanceComparison {
            period1: (*first.snapshot).clone(),
            period2: (*second.snapshot).clone(),
            variances,
            total_variance,
            generated_at: Utc::now(),
        })
    }
}

fn collect_sides(data: &TrialBalanceData) -> BTreeMap<Uuid, Side> {
    data.categories
        .iter()
        .flat_map(|group| group.accounts.iter())
        .map(|account| {
            (
                account.account_id,
                Side {
                    account_name: account.account_name.clone(),
                    category: account.category,
                    balance: account.net_balance,
                },
            )
        })
        .collect()
}

fn derive_variances(period1: &TrialBalanceData, period2: &TrialBalanceData) -> Vec<AccountVariance> {
    let first = collect_sides(period1);
    let second = collect_sides(period2);

    let mut union: BTreeMap<Uuid, (Option<Side>, Option<Side>)> = BTreeMap::new();
    for (id, side) in first {
        union.entry(id).or_default().0 = Some(side);
    }
    for (id, side) in second {
        union.entry(id).or_default().1 = Some(side);
    }

    let mut variances: Vec<AccountVariance> = union
        .into_iter()
        .filter_map(|(account_id, (one, two))| {
            // The union is built from present sides only, so one side exists.
            let meta = two.as_ref().or(one.as_ref())?;
            let (account_name, category) = (meta.account_name.clone(), meta.category);

            let in_one = one.is_some();
            let in_two = two.is_some();
            let period1_balance = one.map_or(Decimal::ZERO, |s| s.balance);
            let period2_balance = two.map_or(Decimal::ZERO, |s| s.balance);
            let absolute_change = period2_balance - period1_balance;

            let change_type = if in_two && !in_one {
                ChangeType::New
            } else if in_one && !in_two {
                ChangeType::Removed
            } else if absolute_change > Decimal::ZERO {
                ChangeType::Increased
            } else if absolute_change < Decimal::ZERO {
                ChangeType::Decreased
            } else {
                ChangeType::Unchanged
            };

            let percentage_change = if period1_balance == Decimal::ZERO {
                if absolute_change == Decimal::ZERO {
                    Some(Decimal::ZERO)
                } else {
                    None
                }
            } else {
                Some(absolute_change / period1_balance.abs() * Decimal::ONE_HUNDRED)
            };

            Some(AccountVariance {
                account_id,
                account_name,
                category,
                period1_balance,
                period2_balance,
                absolute_change,
                percentage_change,
                change_type,
            })
        })
        .collect();

    variances.sort_by(|a, b| {
        b.absolute_change
            .abs()
            .cmp(&a.absolute_change.abs())
            .then_with(|| a.account_name.cmp(&b.account_name))
    });
    variances
}
