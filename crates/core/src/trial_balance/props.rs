//! Property tests for the aggregation and audit invariants.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use loomledger_shared::{DateRange, quantize};

use crate::chart::AccountCategory;
use crate::ledger::{AccountRef, JournalLine};

use super::aggregator::CategoryAggregator;
use super::audit::AuditValidator;
use super::types::{CalculationOptions, TrialBalanceData};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn range() -> DateRange {
    DateRange::new(date(2026, 1, 1), date(2026, 1, 31))
}

fn chart() -> Vec<AccountRef> {
    let specs = [
        ("1000", "Cash", AccountCategory::Assets),
        ("1200", "Receivables", AccountCategory::Assets),
        ("2000", "Payables", AccountCategory::Liabilities),
        ("3000", "Owner Capital", AccountCategory::Equity),
        ("4000", "Sales", AccountCategory::Income),
        ("5000", "Rent Expense", AccountCategory::Expenses),
    ];
    specs
        .into_iter()
        .map(|(code, name, category)| AccountRef {
            account_id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            category,
        })
        .collect()
}

prop_compose! {
    fn arb_posting()(
        account_index in 0usize..6,
        cents in -5_000_000i64..5_000_000,
        day in 1u32..=31,
    ) -> (usize, Decimal, u32) {
        (account_index, Decimal::new(cents, 2), day)
    }
}

/// Expands each signed posting into its balanced double-entry pair: the
/// posting on the chosen account and the offsetting line on another one.
fn balanced_lines(chart: &[AccountRef], postings: &[(usize, Decimal, u32)]) -> Vec<JournalLine> {
    let mut lines = Vec::with_capacity(postings.len() * 2);
    for &(index, amount, day) in postings {
        let account = &chart[index];
        let counter = &chart[(index + 1) % chart.len()];
        let posted_on = date(2026, 1, day);
        lines.push(JournalLine {
            account_id: account.account_id,
            category: account.category,
            amount: quantize(amount),
            description: String::new(),
            posted_on,
        });
        lines.push(JournalLine {
            account_id: counter.account_id,
            category: counter.category,
            amount: quantize(-amount),
            description: String::new(),
            posted_on,
        });
    }
    lines
}

fn snapshot(lines: &[JournalLine], accounts: &[AccountRef]) -> TrialBalanceData {
    let groups = CategoryAggregator::new().aggregate(accounts, lines, &CalculationOptions::default());
    TrialBalanceData::from_categories(range(), groups)
}

proptest! {
    /// Balanced double-entry data always nets to a zero final balance.
    #[test]
    fn balanced_postings_produce_zero_final_balance(
        postings in prop::collection::vec(arb_posting(), 0..60)
    ) {
        let accounts = chart();
        let lines = balanced_lines(&accounts, &postings);
        let data = snapshot(&lines, &accounts);

        prop_assert_eq!(data.final_balance, Decimal::ZERO);
        prop_assert_eq!(data.total_credits + data.total_debits, Decimal::ZERO);
    }

    /// Each category subtotal equals the sum of its member balances, and the
    /// grand totals equal the sum across categories.
    #[test]
    fn subtotals_are_consistent(
        postings in prop::collection::vec(arb_posting(), 0..60)
    ) {
        let accounts = chart();
        let lines = balanced_lines(&accounts, &postings);
        let data = snapshot(&lines, &accounts);

        let mut net_across_categories = Decimal::ZERO;
        for group in &data.categories {
            let member_sum: Decimal = group.accounts.iter().map(|a| a.net_balance).sum();
            prop_assert_eq!(group.subtotal, member_sum);
            net_across_categories += group.subtotal;
        }
        prop_assert_eq!(net_across_categories, data.final_balance);
    }

    /// A snapshot straight out of the aggregator always passes audit.
    #[test]
    fn fresh_snapshots_pass_audit(
        postings in prop::collection::vec(arb_posting(), 0..60)
    ) {
        let accounts = chart();
        let lines = balanced_lines(&accounts, &postings);
        let data = snapshot(&lines, &accounts);

        prop_assert!(AuditValidator::new().validate(&data, &lines).is_ok());
    }

    /// Per-account legs keep their signs: debits never positive, credits
    /// never negative, and the net is their sum.
    #[test]
    fn account_legs_keep_signed_convention(
        postings in prop::collection::vec(arb_posting(), 1..60)
    ) {
        let accounts = chart();
        let lines = balanced_lines(&accounts, &postings);
        let data = snapshot(&lines, &accounts);

        for group in &data.categories {
            for account in &group.accounts {
                prop_assert!(account.debit_amount <= Decimal::ZERO);
                prop_assert!(account.credit_amount >= Decimal::ZERO);
                prop_assert_eq!(
                    account.net_balance,
                    account.credit_amount + account.debit_amount
                );
            }
        }
    }

    /// Transaction counts tally to the number of aggregated lines.
    #[test]
    fn transaction_counts_tally(
        postings in prop::collection::vec(arb_posting(), 0..60)
    ) {
        let accounts = chart();
        let lines = balanced_lines(&accounts, &postings);
        let data = snapshot(&lines, &accounts);

        prop_assert_eq!(data.total_transactions as usize, lines.len());
    }
}
