//! Dashboard-facing balance summary built on the trial balance engine.

pub mod service;
pub mod types;

pub use service::BalanceSummaryService;
pub use types::{BalanceSummary, KeyAccount};
