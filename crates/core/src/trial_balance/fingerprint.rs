//! Request fingerprinting for cache and memoization keys.

use chrono::NaiveDate;

use loomledger_shared::DateRange;

use crate::chart::AccountCategory;

use super::types::CalculationOptions;

/// The identity of one calculation request.
///
/// Two requests with equal fingerprints are guaranteed to produce equal
/// snapshots against unchanged ledger data, so the fingerprint is the key
/// for both the memoization layer and the snapshot store. The category
/// filter is normalized (sorted, deduplicated) so semantically equal
/// filters hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    /// Range start date.
    pub start: NaiveDate,
    /// Range end date.
    pub end: NaiveDate,
    /// Whether results are presented grouped by category.
    pub group_by_category: bool,
    /// Whether zero-balance accounts are kept.
    pub include_zero_balances: bool,
    /// Normalized category filter, `None` for all categories.
    pub category_filter: Option<Vec<AccountCategory>>,
}

impl Fingerprint {
    /// Builds the fingerprint for a request, normalizing the filter.
    #[must_use]
    pub fn new(range: DateRange, options: &CalculationOptions) -> Self {
        let category_filter = options.category_filter.as_ref().map(|filter| {
            let mut categories = filter.clone();
            categories.sort();
            categories.dedup();
            categories
        });
        Self {
            start: range.start,
            end: range.end,
            group_by_category: options.group_by_category,
            include_zero_balances: options.include_zero_balances,
            category_filter,
        }
    }

    /// The range this fingerprint covers.
    #[must_use]
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start, self.end)
    }

    /// Returns true if a posting on `date` could change this request's
    /// snapshot, which is exactly when the date falls inside the range.
    #[must_use]
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.range().contains(date)
    }

    /// Renders the stable string key used by external key-value stores.
    #[must_use]
    pub fn cache_key(&self) -> String {
        let grouping = if self.group_by_category {
            "grouped"
        } else {
            "flat"
        };
        let zeros = if self.include_zero_balances {
            "zero"
        } else {
            "nozero"
        };
        let filter = self.category_filter.as_ref().map_or_else(
            || "all".to_string(),
            |categories| {
                categories
                    .iter()
                    .map(|c| c.name())
                    .collect::<Vec<_>>()
                    .join(",")
            },
        );
        format!(
            "tb:{}:{}:{}:{}:{}",
            self.start, self.end, grouping, zeros, filter
        )
    }
}
