//! Snapshot store contract and in-memory implementation.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use dashmap::DashMap;

use super::error::CacheError;
use super::fingerprint::Fingerprint;
use super::types::TrialBalanceData;

/// Longer-lived snapshot cache shared across processes.
///
/// Backed by a key-value store in deployment; the engine talks to it only
/// through this trait so tests and single-node setups can run fully in
/// memory. Every method is fallible and every failure is survivable: the
/// calculator logs and recomputes instead of failing the request.
pub trait SnapshotStore: Send + Sync {
    /// Looks up a snapshot. `Ok(None)` is a miss, not an error.
    fn get(
        &self,
        fingerprint: &Fingerprint,
    ) -> impl Future<Output = Result<Option<TrialBalanceData>, CacheError>> + Send;

    /// Stores a snapshot under the fingerprint with the given TTL.
    fn put(
        &self,
        fingerprint: &Fingerprint,
        snapshot: &TrialBalanceData,
        ttl: Duration,
    ) -> impl Future<Output = Result<(), CacheError>> + Send;

    /// Removes every snapshot whose range covers `date`, returning how many
    /// were dropped.
    fn invalidate_covering(
        &self,
        date: NaiveDate,
    ) -> impl Future<Output = Result<u64, CacheError>> + Send;

    /// Removes everything.
    fn clear(&self) -> impl Future<Output = Result<(), CacheError>> + Send;
}

#[derive(Debug, Clone)]
struct StoredSnapshot {
    snapshot: TrialBalanceData,
    stored_at: Instant,
    ttl: Duration,
}

impl StoredSnapshot {
    fn is_expired(&self) -> bool {
        self.stored_at.elapsed() >= self.ttl
    }
}

/// Process-local snapshot store with per-entry TTL, expired lazily on read.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    entries: DashMap<Fingerprint, StoredSnapshot>,
}

impl InMemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included until touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    async fn get(&self, fingerprint: &Fingerprint) -> Result<Option<TrialBalanceData>, CacheError> {
        if let Some(stored) = self.entries.get(fingerprint) {
            if !stored.is_expired() {
                return Ok(Some(stored.snapshot.clone()));
            }
        }
        // Reclaim the slot if what we found had expired.
        self.entries
            .remove_if(fingerprint, |_, stored| stored.is_expired());
        Ok(None)
    }

    async fn put(
        &self,
        fingerprint: &Fingerprint,
        snapshot: &TrialBalanceData,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        self.entries.insert(
            fingerprint.clone(),
            StoredSnapshot {
                snapshot: snapshot.clone(),
                stored_at: Instant::now(),
                ttl,
            },
        );
        Ok(())
    }

    async fn invalidate_covering(&self, date: NaiveDate) -> Result<u64, CacheError> {
        let before = self.entries.len();
        self.entries.retain(|fp, _| !fp.covers(date));
        Ok(before.saturating_sub(self.entries.len()) as u64)
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.clear();
        Ok(())
    }
}
