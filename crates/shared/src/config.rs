//! Engine configuration management.

use chrono::NaiveDate;
use serde::Deserialize;

/// Configuration for the trial balance engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Cache layer configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Ledger read path configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Balance summary configuration.
    #[serde(default)]
    pub summary: SummaryConfig,
}

/// Cache layer configuration.
///
/// The memoization layer collapses request bursts and holds entries for
/// seconds; the snapshot store is the longer-lived cross-process cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Memoization entry time-to-live in seconds.
    #[serde(default = "default_memo_ttl")]
    pub memo_ttl_secs: u64,
    /// Maximum number of memoized calculations.
    #[serde(default = "default_memo_capacity")]
    pub memo_capacity: u64,
    /// Snapshot store entry time-to-live in seconds.
    #[serde(default = "default_snapshot_ttl")]
    pub snapshot_ttl_secs: u64,
}

fn default_memo_ttl() -> u64 {
    30
}

fn default_memo_capacity() -> u64 {
    512
}

fn default_snapshot_ttl() -> u64 {
    300 // 5 minutes
}

/// Ledger read path configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Timeout for a single ledger store round-trip, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
    /// Earliest date the ledger can contain postings for.
    ///
    /// Used as the start bound when summarizing balances "as of" a date.
    #[serde(default = "default_epoch")]
    pub epoch: NaiveDate,
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch date")
}

/// Balance summary configuration.
///
/// Bank and cash balances are projected by account-code convention, with an
/// account-name fallback for charts that do not follow the numbering scheme.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryConfig {
    /// Account code prefixes identifying bank accounts.
    #[serde(default = "default_bank_prefixes")]
    pub bank_code_prefixes: Vec<String>,
    /// Account code prefixes identifying cash-on-hand accounts.
    #[serde(default = "default_cash_prefixes")]
    pub cash_code_prefixes: Vec<String>,
}

fn default_bank_prefixes() -> Vec<String> {
    vec!["1010".to_string(), "1011".to_string()]
}

fn default_cash_prefixes() -> Vec<String> {
    vec!["1000".to_string(), "1001".to_string()]
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memo_ttl_secs: default_memo_ttl(),
            memo_capacity: default_memo_capacity(),
            snapshot_ttl_secs: default_snapshot_ttl(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout(),
            epoch: default_epoch(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            bank_code_prefixes: default_bank_prefixes(),
            cash_code_prefixes: default_cash_prefixes(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            ledger: LedgerConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LOOMLEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
