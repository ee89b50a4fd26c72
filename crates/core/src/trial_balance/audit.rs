//! Independent audit validation of snapshot arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::chart::AccountCategory;
use crate::ledger::JournalLine;

use super::types::TrialBalanceData;

/// One arithmetic violation found by the audit pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Violation {
    /// The snapshot's grand totals disagree with an independent re-sum of the
    /// raw journal lines.
    LedgerTotalsMismatch {
        /// Snapshot total minus the re-summed ledger total, debit side.
        debit_delta: Decimal,
        /// Snapshot total minus the re-summed ledger total, credit side.
        credit_delta: Decimal,
    },
    /// A category subtotal disagrees with the sum of its member accounts.
    SubtotalMismatch {
        /// The offending category.
        category: AccountCategory,
        /// Recorded subtotal minus the recomputed member sum.
        delta: Decimal,
    },
    /// The recorded final balance disagrees with `credits + debits`.
    FinalBalanceMismatch {
        /// Recorded final balance minus the recomputed value.
        delta: Decimal,
    },
}

impl Violation {
    /// Absolute magnitude of this violation's discrepancy.
    #[must_use]
    pub fn magnitude(&self) -> Decimal {
        match self {
            Self::LedgerTotalsMismatch {
                debit_delta,
                credit_delta,
            } => debit_delta.abs() + credit_delta.abs(),
            Self::SubtotalMismatch { delta, .. } | Self::FinalBalanceMismatch { delta } => {
                delta.abs()
            }
        }
    }
}

/// Re-derives every snapshot total from first principles and compares.
///
/// The validator shares no code with the aggregator on purpose: the whole
/// point is a second, independent path to the same numbers. Runs after every
/// fresh calculation and before anything reaches a cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditValidator;

impl AuditValidator {
    /// Creates a validator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Validates `data` against the raw `lines` it was computed from.
    ///
    /// # Errors
    ///
    /// Returns every violation found, never just the first.
    pub fn validate(
        self,
        data: &TrialBalanceData,
        lines: &[JournalLine],
    ) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();

        let mut ledger_debits = Decimal::ZERO;
        let mut ledger_credits = Decimal::ZERO;
        for line in lines {
            if line.is_debit() {
                ledger_debits += line.amount;
            } else {
                ledger_credits += line.amount;
            }
        }

        let debit_delta = data.total_debits - ledger_debits;
        let credit_delta = data.total_credits - ledger_credits;
        if debit_delta != Decimal::ZERO || credit_delta != Decimal::ZERO {
            violations.push(Violation::LedgerTotalsMismatch {
                debit_delta,
                credit_delta,
            });
        }

        for group in &data.categories {
            let recomputed: Decimal = group.accounts.iter().map(|a| a.net_balance).sum();
            let delta = group.subtotal - recomputed;
            if delta != Decimal::ZERO {
                violations.push(Violation::SubtotalMismatch {
                    category: group.category,
                    delta,
                });
            }
        }

        let final_delta = data.final_balance - (data.total_credits + data.total_debits);
        if final_delta != Decimal::ZERO {
            violations.push(Violation::FinalBalanceMismatch { delta: final_delta });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Sum of violation magnitudes, for the inconsistency error payload.
    #[must_use]
    pub fn discrepancy(violations: &[Violation]) -> Decimal {
        violations.iter().map(Violation::magnitude).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial_balance::aggregator::CategoryAggregator;
    use crate::trial_balance::types::CalculationOptions;
    use chrono::NaiveDate;
    use loomledger_shared::DateRange;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range() -> DateRange {
        DateRange::new(date(2026, 1, 1), date(2026, 1, 31))
    }

    fn sample() -> (TrialBalanceData, Vec<JournalLine>) {
        let cash = crate::ledger::AccountRef {
            account_id: Uuid::new_v4(),
            code: "1000".to_string(),
            name: "Cash".to_string(),
            category: AccountCategory::Assets,
        };
        let sales = crate::ledger::AccountRef {
            account_id: Uuid::new_v4(),
            code: "4000".to_string(),
            name: "Sales".to_string(),
            category: AccountCategory::Income,
        };
        let lines = vec![
            JournalLine {
                account_id: cash.account_id,
                category: AccountCategory::Assets,
                amount: dec!(-1000.00),
                description: String::new(),
                posted_on: date(2026, 1, 10),
            },
            JournalLine {
                account_id: sales.account_id,
                category: AccountCategory::Income,
                amount: dec!(1000.00),
                description: String::new(),
                posted_on: date(2026, 1, 10),
            },
        ];
        let groups = CategoryAggregator::new().aggregate(
            &[cash, sales],
            &lines,
            &CalculationOptions::default(),
        );
        (TrialBalanceData::from_categories(range(), groups), lines)
    }

    #[test]
    fn test_consistent_snapshot_passes() {
        let (data, lines) = sample();
        assert!(AuditValidator::new().validate(&data, &lines).is_ok());
    }

    #[test]
    fn test_tampered_subtotal_detected() {
        let (mut data, lines) = sample();
        data.categories[0].subtotal += dec!(0.01);

        let violations = AuditValidator::new().validate(&data, &lines).unwrap_err();
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::SubtotalMismatch { .. })));
        assert_eq!(AuditValidator::discrepancy(&violations), dec!(0.01));
    }

    #[test]
    fn test_dropped_line_detected_as_totals_mismatch() {
        let (data, mut lines) = sample();
        lines.push(JournalLine {
            account_id: Uuid::new_v4(),
            category: AccountCategory::Assets,
            amount: dec!(75.00),
            description: String::new(),
            posted_on: date(2026, 1, 11),
        });

        let violations = AuditValidator::new().validate(&data, &lines).unwrap_err();
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::LedgerTotalsMismatch { .. })));
    }

    #[test]
    fn test_tampered_final_balance_detected() {
        let (mut data, lines) = sample();
        data.final_balance += dec!(5);

        let violations = AuditValidator::new().validate(&data, &lines).unwrap_err();
        assert!(violations
            .iter()
            .any(|v| matches!(v, Violation::FinalBalanceMismatch { .. })));
    }

    #[test]
    fn test_all_violations_reported_together() {
        let (mut data, lines) = sample();
        data.categories[0].subtotal += dec!(1);
        data.final_balance += dec!(2);

        let violations = AuditValidator::new().validate(&data, &lines).unwrap_err();
        assert_eq!(violations.len(), 2);
        assert_eq!(AuditValidator::discrepancy(&violations), dec!(3));
    }
}
