//! Account category classification rules.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The five standard trial balance categories, in fixed display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountCategory {
    /// Asset accounts (cash, bank, inventory, receivables, fixed assets).
    Assets,
    /// Liability accounts (payables, loans, taxes payable).
    Liabilities,
    /// Equity accounts (capital, retained earnings).
    Equity,
    /// Income accounts (sales, service income, other income).
    Income,
    /// Expense accounts (cost of goods sold, payroll, operating).
    Expenses,
}

impl AccountCategory {
    /// All categories in report display order: Assets, Liabilities, Equity,
    /// Income, Expenses.
    pub const DISPLAY_ORDER: [Self; 5] = [
        Self::Assets,
        Self::Liabilities,
        Self::Equity,
        Self::Income,
        Self::Expenses,
    ];

    /// Classifies a chart-of-accounts account type string.
    ///
    /// Returns `None` for unknown types so that callers decide whether an
    /// unclassifiable account is an error or gets skipped.
    #[must_use]
    pub fn from_account_type(account_type: &str) -> Option<Self> {
        match account_type.to_lowercase().as_str() {
            "asset" => Some(Self::Assets),
            "liability" => Some(Self::Liabilities),
            "equity" => Some(Self::Equity),
            "revenue" | "income" => Some(Self::Income),
            "expense" => Some(Self::Expenses),
            _ => None,
        }
    }

    /// The display name used in reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Assets => "Assets",
            Self::Liabilities => "Liabilities",
            Self::Equity => "Equity",
            Self::Income => "Income",
            Self::Expenses => "Expenses",
        }
    }

    /// The normal balance side of accounts in this category.
    #[must_use]
    pub const fn normal_balance(self) -> NormalBalance {
        match self {
            Self::Assets | Self::Expenses => NormalBalance::Debit,
            Self::Liabilities | Self::Equity | Self::Income => NormalBalance::Credit,
        }
    }
}

impl std::fmt::Display for AccountCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side increases an account's balance.
///
/// - Debit-normal (Assets, Expenses): natural balance = debits - credits
/// - Credit-normal (Liabilities, Equity, Income): natural balance = credits - debits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NormalBalance {
    /// Debit-normal accounts.
    Debit,
    /// Credit-normal accounts.
    Credit,
}

impl NormalBalance {
    /// Converts a signed net balance (debits negative, credits positive)
    /// into the account's natural presentation balance.
    #[must_use]
    pub fn natural(self, signed_net: Decimal) -> Decimal {
        match self {
            Self::Debit => -signed_net,
            Self::Credit => signed_net,
        }
    }
}

/// Derives a sub-category description for an account from its name.
///
/// Name-pattern heuristics carried over from the original chart conventions;
/// purely informational, never used for classification or totals.
#[must_use]
pub fn describe_account(account_name: &str, category: AccountCategory) -> String {
    let name = account_name.to_lowercase();

    let description = match category {
        AccountCategory::Assets => {
            if name.contains("cash") || name.contains("bank") {
                "Current Assets - Cash & Bank"
            } else if name.contains("inventory") || name.contains("stock") {
                "Current Assets - Inventory"
            } else if name.contains("receivable") || name.contains("debtor") {
                "Current Assets - Accounts Receivable"
            } else if name.contains("equipment") || name.contains("machinery") {
                "Fixed Assets - Equipment"
            } else if name.contains("building") || name.contains("property") {
                "Fixed Assets - Property"
            } else {
                "Assets - General"
            }
        }
        AccountCategory::Liabilities => {
            if name.contains("payable") || name.contains("creditor") {
                "Current Liabilities - Accounts Payable"
            } else if name.contains("loan") || name.contains("debt") {
                "Long-term Liabilities - Loans"
            } else if name.contains("tax") || name.contains("vat") {
                "Current Liabilities - Tax Payable"
            } else {
                "Liabilities - General"
            }
        }
        AccountCategory::Equity => {
            if name.contains("capital") || name.contains("owner") {
                "Equity - Owner's Capital"
            } else if name.contains("retained") || name.contains("earning") {
                "Equity - Retained Earnings"
            } else {
                "Equity - General"
            }
        }
        AccountCategory::Income => {
            if name.contains("sales") {
                "Income - Sales"
            } else if name.contains("service") || name.contains("fee") {
                "Income - Service Income"
            } else if name.contains("interest") || name.contains("investment") {
                "Income - Other Income"
            } else {
                "Income - General"
            }
        }
        AccountCategory::Expenses => {
            if name.contains("cost") || name.contains("cogs") {
                "Expenses - Cost of Goods Sold"
            } else if name.contains("salary") || name.contains("wage") {
                "Expenses - Payroll"
            } else if name.contains("rent") || name.contains("utilities") {
                "Expenses - Operating"
            } else if name.contains("marketing") || name.contains("advertising") {
                "Expenses - Marketing"
            } else {
                "Expenses - General"
            }
        }
    };

    description.to_string()
}
