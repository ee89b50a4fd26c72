//! Trial balance calculation and caching.
//!
//! This module implements the core engine:
//! - Snapshot value types and calculation options
//! - Request fingerprinting for cache/memoization keys
//! - Category aggregation with the signed-amount convention
//! - Independent audit validation of the debit/credit invariant
//! - Short-TTL memoization (single-flight request collapsing)
//! - Longer-TTL snapshot store with posting-driven invalidation
//! - The calculator orchestrating all of the above
//! - Per-account transaction drill-down with running balances
//! - Period comparison with per-account variances

pub mod aggregator;
pub mod audit;
pub mod calculator;
pub mod compare;
pub mod error;
pub mod fingerprint;
pub mod memo;
pub mod store;
pub mod types;

#[cfg(test)]
mod props;

pub use aggregator::CategoryAggregator;
pub use audit::{AuditValidator, Violation};
pub use calculator::TrialBalanceCalculator;
pub use compare::{AccountVariance, ChangeType, ComparisonEngine, TrialBalanceComparison};
pub use error::{CacheError, TrialBalanceError};
pub use fingerprint::Fingerprint;
pub use memo::MemoizationLayer;
pub use store::{InMemorySnapshotStore, SnapshotStore};
pub use types::{
    AccountBalance, AccountTransactions, CalculationOptions, CalculationOutcome,
    CategoryBalances, TransactionEntry, TrialBalanceData,
};
