//! Trial balance calculation orchestration.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use loomledger_shared::{DateRange, EngineConfig};

use crate::chart::AccountCategory;
use crate::ledger::{AccountRef, JournalLine, LedgerReader};

use super::aggregator::CategoryAggregator;
use super::audit::AuditValidator;
use super::error::TrialBalanceError;
use super::fingerprint::Fingerprint;
use super::memo::{Memoized, MemoizationLayer};
use super::store::SnapshotStore;
use super::types::{
    AccountTransactions, CalculationOptions, CalculationOutcome, TransactionEntry,
    TrialBalanceData,
};

/// The trial balance engine.
///
/// Layered lookup on every request: memoization first, then the snapshot
/// store, then a fresh computation from ledger data. Fresh snapshots are
/// audit-validated before anything caches them. Snapshot store failures
/// degrade to recomputation and never fail a request.
pub struct TrialBalanceCalculator<R, S> {
    reader: R,
    store: S,
    memo: MemoizationLayer,
    fetch_timeout: Duration,
    snapshot_ttl: Duration,
}

impl<R, S> std::fmt::Debug for TrialBalanceCalculator<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrialBalanceCalculator")
            .field("memo", &self.memo)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("snapshot_ttl", &self.snapshot_ttl)
            .finish_non_exhaustive()
    }
}

impl<R, S> TrialBalanceCalculator<R, S>
where
    R: LedgerReader,
    S: SnapshotStore,
{
    /// Creates a calculator over the given reader and snapshot store.
    #[must_use]
    pub fn new(reader: R, store: S, config: &EngineConfig) -> Self {
        Self {
            reader,
            store,
            memo: MemoizationLayer::new(
                Duration::from_secs(config.cache.memo_ttl_secs),
                config.cache.memo_capacity,
            ),
            fetch_timeout: Duration::from_secs(config.ledger.fetch_timeout_secs),
            snapshot_ttl: Duration::from_secs(config.cache.snapshot_ttl_secs),
        }
    }

    /// Calculates the trial balance for `range` under `options`.
    ///
    /// Concurrent calls with the same range and options collapse into one
    /// computation.
    ///
    /// # Errors
    ///
    /// - `InvalidRange` / `RangeInFuture` for a bad range.
    /// - `DataAccess` when the ledger store fails or times out.
    /// - `Inconsistency` when the audit pass finds a mismatch.
    pub async fn calculate(
        &self,
        range: DateRange,
        options: &CalculationOptions,
    ) -> Result<CalculationOutcome, TrialBalanceError> {
        validate_range(range)?;

        let fingerprint = Fingerprint::new(range, options);
        debug!(key = %fingerprint.cache_key(), "trial balance requested");

        let (memoized, fresh) = self
            .memo
            .get_or_compute(fingerprint.clone(), self.lookup_or_compute(&fingerprint, range, options))
            .await?;

        Ok(CalculationOutcome {
            snapshot: memoized.snapshot,
            from_cache: !fresh || memoized.from_store,
        })
    }

    /// Snapshot store lookup, falling through to a full computation.
    async fn lookup_or_compute(
        &self,
        fingerprint: &Fingerprint,
        range: DateRange,
        options: &CalculationOptions,
    ) -> Result<Memoized, TrialBalanceError> {
        match self.store.get(fingerprint).await {
            Ok(Some(snapshot)) => {
                debug!(key = %fingerprint.cache_key(), "snapshot store hit");
                return Ok(Memoized {
                    snapshot: Arc::new(snapshot),
                    from_store: true,
                });
            }
            Ok(None) => {}
            Err(err) => {
                warn!(error = %err, "snapshot store read failed, computing without cache");
            }
        }

        let snapshot = self.compute(range, options).await?;

        if let Err(err) = self
            .store
            .put(fingerprint, &snapshot, self.snapshot_ttl)
            .await
        {
            warn!(error = %err, "snapshot store write failed, result not cached");
        }

        Ok(Memoized {
            snapshot: Arc::new(snapshot),
            from_store: false,
        })
    }

    /// Chart fetch behind the configured timeout.
    async fn fetch_accounts_timed(
        &self,
        filter: Option<&[AccountCategory]>,
    ) -> Result<Vec<AccountRef>, TrialBalanceError> {
        tokio::time::timeout(self.fetch_timeout, self.reader.fetch_accounts(filter))
            .await
            .map_err(|_| {
                TrialBalanceError::DataAccess(format!(
                    "chart fetch timed out after {}s",
                    self.fetch_timeout.as_secs()
                ))
            })?
            .map_err(|e| TrialBalanceError::DataAccess(e.to_string()))
    }

    /// Journal fetch behind the configured timeout.
    async fn fetch_lines_timed(
        &self,
        range: DateRange,
        filter: Option<&[AccountCategory]>,
    ) -> Result<Vec<JournalLine>, TrialBalanceError> {
        tokio::time::timeout(self.fetch_timeout, self.reader.fetch_lines(range, filter))
            .await
            .map_err(|_| {
                TrialBalanceError::DataAccess(format!(
                    "journal fetch timed out after {}s",
                    self.fetch_timeout.as_secs()
                ))
            })?
            .map_err(|e| TrialBalanceError::DataAccess(e.to_string()))
    }

    /// Fetches ledger data, aggregates, and audit-validates one snapshot.
    async fn compute(
        &self,
        range: DateRange,
        options: &CalculationOptions,
    ) -> Result<TrialBalanceData, TrialBalanceError> {
        let filter = options.category_filter.as_deref();

        let accounts = self.fetch_accounts_timed(filter).await?;
        let lines = self.fetch_lines_timed(range, filter).await?;

        let categories = CategoryAggregator::new().aggregate(&accounts, &lines, options);
        let snapshot = TrialBalanceData::from_categories(range, categories);

        if let Err(violations) = AuditValidator::new().validate(&snapshot, &lines) {
            let discrepancy = AuditValidator::discrepancy(&violations);
            warn!(
                %discrepancy,
                violation_count = violations.len(),
                "audit validation failed, snapshot rejected"
            );
            return Err(TrialBalanceError::Inconsistency {
                discrepancy,
                violations,
            });
        }

        info!(
            range = %snapshot.date_range,
            transactions = snapshot.total_transactions,
            final_balance = %snapshot.final_balance,
            "trial balance computed"
        );
        Ok(snapshot)
    }

    /// Lists one account's activity in `range` with a running balance.
    ///
    /// The drill-down behind a trial balance row: uncached, since it is a
    /// per-account view requested interactively rather than a report burst.
    ///
    /// # Errors
    ///
    /// - `InvalidRange` / `RangeInFuture` for a bad range.
    /// - `UnknownAccount` when the account is not in the chart.
    /// - `DataAccess` when the ledger store fails or times out.
    pub async fn account_transactions(
        &self,
        account_id: Uuid,
        range: DateRange,
    ) -> Result<AccountTransactions, TrialBalanceError> {
        validate_range(range)?;

        let accounts = self.fetch_accounts_timed(None).await?;
        let account = accounts
            .into_iter()
            .find(|a| a.account_id == account_id)
            .ok_or(TrialBalanceError::UnknownAccount { account_id })?;

        let mut lines: Vec<JournalLine> = self
            .fetch_lines_timed(range, None)
            .await?
            .into_iter()
            .filter(|l| l.account_id == account_id)
            .collect();
        // Stable sort keeps posting order within a day.
        lines.sort_by_key(|l| l.posted_on);

        let mut running = Decimal::ZERO;
        let entries: Vec<TransactionEntry> = lines
            .into_iter()
            .map(|line| {
                running += line.amount;
                TransactionEntry {
                    posted_on: line.posted_on,
                    description: line.description,
                    amount: line.amount,
                    running_balance: running,
                }
            })
            .collect();

        debug!(
            %account_id,
            entries = entries.len(),
            closing = %running,
            "account drill-down computed"
        );

        Ok(AccountTransactions {
            account_id,
            account_code: account.code,
            account_name: account.name,
            category: account.category,
            date_range: range,
            entries,
            closing_balance: running,
        })
    }

    /// Records that a journal entry was posted on `date`, dropping every
    /// cached snapshot whose range covers it.
    pub async fn note_posting(&self, date: NaiveDate) {
        self.memo.invalidate_covering(date);
        match self.store.invalidate_covering(date).await {
            Ok(dropped) => debug!(%date, dropped, "snapshots invalidated for posting"),
            Err(err) => {
                warn!(error = %err, %date, "snapshot store invalidation failed");
            }
        }
    }

    /// Drops all cached results, memoized and stored.
    pub async fn refresh_cache(&self) {
        self.memo.invalidate_all();
        if let Err(err) = self.store.clear().await {
            warn!(error = %err, "snapshot store clear failed");
        }
        info!("trial balance caches cleared");
    }

    /// The reader this calculator was built over.
    pub fn reader(&self) -> &R {
        &self.reader
    }
}

/// Rejects unordered ranges and ranges reaching past the current date.
fn validate_range(range: DateRange) -> Result<(), TrialBalanceError> {
    if !range.is_ordered() {
        return Err(TrialBalanceError::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }
    let today = Utc::now().date_naive();
    if range.end > today {
        return Err(TrialBalanceError::RangeInFuture {
            end: range.end,
            today,
        });
    }
    Ok(())
}
