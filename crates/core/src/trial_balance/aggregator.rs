//! Per-account accumulation and category grouping.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::chart::{AccountCategory, describe_account};
use crate::ledger::{AccountRef, JournalLine};

use super::types::{AccountBalance, CalculationOptions, CategoryBalances};

/// Folds raw journal lines into per-account balances grouped by category.
///
/// Pure and synchronous; the calculator feeds it already-fetched data. Lines
/// posted to accounts absent from the chart are skipped here, which the audit
/// validator then detects as a totals mismatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryAggregator;

#[derive(Debug, Default)]
struct Accumulator {
    debit: Decimal,
    credit: Decimal,
    count: u32,
    latest_particulars: Option<(NaiveDate, String)>,
}

impl Accumulator {
    fn fold(&mut self, line: &JournalLine) {
        if line.is_debit() {
            self.debit += line.amount;
        } else {
            self.credit += line.amount;
        }
        self.count += 1;

        if !line.description.is_empty()
            && self
                .latest_particulars
                .as_ref()
                .is_none_or(|(date, _)| line.posted_on >= *date)
        {
            self.latest_particulars = Some((line.posted_on, line.description.clone()));
        }
    }
}

impl CategoryAggregator {
    /// Creates an aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Aggregates `lines` over the chart `accounts` into category groups.
    ///
    /// - Every chart account appears, with zeros if it saw no activity,
    ///   unless zero-balance accounts are excluded by `options`.
    /// - Accounts within a category are sorted by name.
    /// - Without a category filter all five categories are emitted in display
    ///   order, empty ones included; with a filter only the filtered
    ///   categories appear.
    #[must_use]
    pub fn aggregate(
        self,
        accounts: &[AccountRef],
        lines: &[JournalLine],
        options: &CalculationOptions,
    ) -> Vec<CategoryBalances> {
        let mut by_account: HashMap<Uuid, Accumulator> = HashMap::new();
        let chart_ids: std::collections::HashSet<Uuid> =
            accounts.iter().map(|a| a.account_id).collect();

        for line in lines {
            if chart_ids.contains(&line.account_id) {
                by_account.entry(line.account_id).or_default().fold(line);
            }
        }

        let mut groups: HashMap<AccountCategory, Vec<AccountBalance>> = HashMap::new();
        for account in accounts {
            let acc = by_account.remove(&account.account_id).unwrap_or_default();
            let net = acc.credit + acc.debit;

            // A zero net balance with real activity still carries audit
            // interest, so only truly inactive accounts are dropped.
            if !options.include_zero_balances && net == Decimal::ZERO && acc.count == 0 {
                continue;
            }

            groups
                .entry(account.category)
                .or_default()
                .push(AccountBalance {
                    account_id: account.account_id,
                    account_code: account.code.clone(),
                    account_name: account.name.clone(),
                    category: account.category,
                    category_description: describe_account(&account.name, account.category),
                    particulars: acc
                        .latest_particulars
                        .map(|(_, text)| text)
                        .unwrap_or_default(),
                    debit_amount: acc.debit,
                    credit_amount: acc.credit,
                    net_balance: net,
                    transaction_count: acc.count,
                });
        }

        let emitted: Vec<AccountCategory> = match &options.category_filter {
            Some(filter) => AccountCategory::DISPLAY_ORDER
                .into_iter()
                .filter(|c| filter.contains(c))
                .collect(),
            None => AccountCategory::DISPLAY_ORDER.to_vec(),
        };

        emitted
            .into_iter()
            .map(|category| {
                let mut members = groups.remove(&category).unwrap_or_default();
                members.sort_by(|a, b| a.account_name.cmp(&b.account_name));
                let subtotal = members.iter().map(|a| a.net_balance).sum();
                CategoryBalances {
                    category,
                    accounts: members,
                    subtotal,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn account(code: &str, name: &str, category: AccountCategory) -> AccountRef {
        AccountRef {
            account_id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            category,
        }
    }

    fn line(account: &AccountRef, amount: Decimal, description: &str, day: u32) -> JournalLine {
        JournalLine {
            account_id: account.account_id,
            category: account.category,
            amount,
            description: description.to_string(),
            posted_on: date(2026, 1, day),
        }
    }

    #[test]
    fn test_debit_and_credit_legs_kept_separate() {
        let cash = account("1000", "Cash", AccountCategory::Assets);
        let lines = vec![
            line(&cash, dec!(-1000.00), "purchase", 10),
            line(&cash, dec!(500.00), "receipt", 12),
        ];

        let groups =
            CategoryAggregator::new().aggregate(&[cash], &lines, &CalculationOptions::default());

        let assets = &groups[0];
        assert_eq!(assets.category, AccountCategory::Assets);
        let balance = &assets.accounts[0];
        assert_eq!(balance.debit_amount, dec!(-1000.00));
        assert_eq!(balance.credit_amount, dec!(500.00));
        assert_eq!(balance.net_balance, dec!(-500.00));
        assert_eq!(balance.transaction_count, 2);
        assert_eq!(assets.subtotal, dec!(-500.00));
    }

    #[test]
    fn test_particulars_from_latest_line() {
        let cash = account("1000", "Cash", AccountCategory::Assets);
        let lines = vec![
            line(&cash, dec!(100), "earlier", 5),
            line(&cash, dec!(200), "latest", 20),
            line(&cash, dec!(300), "", 25),
        ];

        let groups =
            CategoryAggregator::new().aggregate(&[cash], &lines, &CalculationOptions::default());
        assert_eq!(groups[0].accounts[0].particulars, "latest");
    }

    #[test]
    fn test_all_categories_emitted_when_unfiltered() {
        let cash = account("1000", "Cash", AccountCategory::Assets);
        let lines = vec![line(&cash, dec!(100), "", 1)];

        let groups =
            CategoryAggregator::new().aggregate(&[cash], &lines, &CalculationOptions::default());

        let categories: Vec<AccountCategory> = groups.iter().map(|g| g.category).collect();
        assert_eq!(categories, AccountCategory::DISPLAY_ORDER.to_vec());
        assert!(groups[1].accounts.is_empty());
        assert_eq!(groups[1].subtotal, Decimal::ZERO);
    }

    #[test]
    fn test_filter_limits_emitted_categories() {
        let cash = account("1000", "Cash", AccountCategory::Assets);
        let sales = account("4000", "Sales", AccountCategory::Income);
        let lines = vec![line(&cash, dec!(-100), "", 1), line(&sales, dec!(100), "", 1)];

        let options = CalculationOptions {
            category_filter: Some(vec![AccountCategory::Income]),
            ..CalculationOptions::default()
        };
        let groups = CategoryAggregator::new().aggregate(&[cash, sales], &lines, &options);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, AccountCategory::Income);
        assert_eq!(groups[0].subtotal, dec!(100));
    }

    #[test]
    fn test_inactive_accounts_dropped_unless_requested() {
        let cash = account("1000", "Cash", AccountCategory::Assets);
        let idle = account("1500", "Idle Equipment", AccountCategory::Assets);
        let lines = vec![line(&cash, dec!(100), "", 1)];

        let default_groups = CategoryAggregator::new().aggregate(
            &[cash.clone(), idle.clone()],
            &lines,
            &CalculationOptions::default(),
        );
        assert_eq!(default_groups[0].accounts.len(), 1);

        let with_zeros = CategoryAggregator::new().aggregate(
            &[cash, idle],
            &lines,
            &CalculationOptions {
                include_zero_balances: true,
                ..CalculationOptions::default()
            },
        );
        assert_eq!(with_zeros[0].accounts.len(), 2);
    }

    #[test]
    fn test_zero_net_with_activity_is_kept() {
        let cash = account("1000", "Cash", AccountCategory::Assets);
        let lines = vec![
            line(&cash, dec!(-250), "out", 3),
            line(&cash, dec!(250), "back", 4),
        ];

        let groups =
            CategoryAggregator::new().aggregate(&[cash], &lines, &CalculationOptions::default());
        assert_eq!(groups[0].accounts.len(), 1);
        assert_eq!(groups[0].accounts[0].net_balance, Decimal::ZERO);
        assert_eq!(groups[0].accounts[0].transaction_count, 2);
    }

    #[test]
    fn test_accounts_sorted_by_name_within_category() {
        let zulu = account("1900", "Zulu Holdings", AccountCategory::Assets);
        let alpha = account("1100", "Alpha Receivable", AccountCategory::Assets);
        let lines = vec![line(&zulu, dec!(10), "", 1), line(&alpha, dec!(20), "", 1)];

        let groups =
            CategoryAggregator::new().aggregate(&[zulu, alpha], &lines, &CalculationOptions::default());
        let names: Vec<&str> = groups[0]
            .accounts
            .iter()
            .map(|a| a.account_name.as_str())
            .collect();
        assert_eq!(names, vec!["Alpha Receivable", "Zulu Holdings"]);
    }

    #[test]
    fn test_orphan_lines_skipped() {
        let cash = account("1000", "Cash", AccountCategory::Assets);
        let orphan = JournalLine {
            account_id: Uuid::new_v4(),
            category: AccountCategory::Assets,
            amount: dec!(999),
            description: String::new(),
            posted_on: date(2026, 1, 1),
        };
        let lines = vec![line(&cash, dec!(100), "", 1), orphan];

        let groups =
            CategoryAggregator::new().aggregate(&[cash], &lines, &CalculationOptions::default());
        assert_eq!(groups[0].subtotal, dec!(100));
    }
}
