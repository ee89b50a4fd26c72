//! Short-TTL memoization with single-flight request collapsing.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use super::error::TrialBalanceError;
use super::fingerprint::Fingerprint;
use super::types::TrialBalanceData;

/// A memoized calculation result.
#[derive(Debug, Clone)]
pub struct Memoized {
    /// The shared snapshot.
    pub snapshot: Arc<TrialBalanceData>,
    /// True when the snapshot came out of the snapshot store rather than a
    /// fresh computation.
    pub from_store: bool,
}

/// In-process cache of recent calculation results, keyed by fingerprint.
///
/// Concurrent requests for the same fingerprint collapse into a single
/// computation; the waiters share the winner's snapshot. Failed computations
/// are never cached, so a transient error does not poison the key.
pub struct MemoizationLayer {
    cache: moka::future::Cache<Fingerprint, Memoized>,
}

impl std::fmt::Debug for MemoizationLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoizationLayer")
            .field("entry_count", &self.cache.entry_count())
            .finish()
    }
}

impl MemoizationLayer {
    /// Creates a layer with the given entry TTL and capacity.
    #[must_use]
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        let cache = moka::future::Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .support_invalidation_closures()
            .build();
        Self { cache }
    }

    /// Returns the memoized result for `fingerprint`, computing it with
    /// `init` on a miss.
    ///
    /// The second tuple element is true when this call ran `init` (a miss);
    /// false means the result was served from memory.
    ///
    /// # Errors
    ///
    /// Propagates the error from `init` verbatim. Nothing is cached on error.
    pub async fn get_or_compute<F>(
        &self,
        fingerprint: Fingerprint,
        init: F,
    ) -> Result<(Memoized, bool), TrialBalanceError>
    where
        F: Future<Output = Result<Memoized, TrialBalanceError>>,
    {
        let entry = self
            .cache
            .entry(fingerprint)
            .or_try_insert_with(init)
            .await
            .map_err(|shared: Arc<TrialBalanceError>| (*shared).clone())?;
        let fresh = entry.is_fresh();
        Ok((entry.into_value(), fresh))
    }

    /// Drops every memoized result whose range covers `date`.
    ///
    /// Called when a journal entry is posted on `date`; ranges that cannot
    /// contain the new line stay memoized.
    pub fn invalidate_covering(&self, date: NaiveDate) {
        // The predicate registration only fails when invalidation closures
        // were not enabled at build time, which `new` always does.
        let _ = self.cache.invalidate_entries_if(move |fp, _| fp.covers(date));
    }

    /// Drops everything.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Approximate number of live entries, for diagnostics. Maintenance is
    /// deferred, so recently expired entries may still be counted.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial_balance::types::CalculationOptions;
    use chrono::NaiveDate;
    use loomledger_shared::DateRange;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fingerprint(start_day: u32) -> Fingerprint {
        Fingerprint::new(
            DateRange::new(date(2026, 1, start_day), date(2026, 1, 31)),
            &CalculationOptions::default(),
        )
    }

    fn memoized() -> Memoized {
        let range = DateRange::new(date(2026, 1, 1), date(2026, 1, 31));
        Memoized {
            snapshot: Arc::new(TrialBalanceData::from_categories(range, Vec::new())),
            from_store: false,
        }
    }

    #[tokio::test]
    async fn test_second_lookup_is_memoized() {
        let layer = MemoizationLayer::new(Duration::from_secs(30), 16);

        let (_, fresh) = layer
            .get_or_compute(fingerprint(1), async { Ok(memoized()) })
            .await
            .unwrap();
        assert!(fresh);

        let (_, fresh) = layer
            .get_or_compute(fingerprint(1), async {
                panic!("should not recompute a memoized key")
            })
            .await
            .unwrap();
        assert!(!fresh);
    }

    #[tokio::test]
    async fn test_error_is_not_cached() {
        let layer = MemoizationLayer::new(Duration::from_secs(30), 16);

        let result = layer
            .get_or_compute(fingerprint(1), async {
                Err(TrialBalanceError::DataAccess("down".to_string()))
            })
            .await;
        assert!(matches!(result, Err(TrialBalanceError::DataAccess(_))));

        let (_, fresh) = layer
            .get_or_compute(fingerprint(1), async { Ok(memoized()) })
            .await
            .unwrap();
        assert!(fresh);
    }

    #[tokio::test]
    async fn test_invalidate_covering_is_selective() {
        let layer = MemoizationLayer::new(Duration::from_secs(30), 16);

        let january = fingerprint(1);
        let late_january = fingerprint(20);
        for fp in [january.clone(), late_january.clone()] {
            layer
                .get_or_compute(fp, async { Ok(memoized()) })
                .await
                .unwrap();
        }

        // A posting on Jan 10 is inside 1..31 but outside 20..31.
        layer.invalidate_covering(date(2026, 1, 10));

        let (_, fresh) = layer
            .get_or_compute(january, async { Ok(memoized()) })
            .await
            .unwrap();
        assert!(fresh);

        let (_, fresh) = layer
            .get_or_compute(late_january, async { Ok(memoized()) })
            .await
            .unwrap();
        assert!(!fresh);
    }
}
