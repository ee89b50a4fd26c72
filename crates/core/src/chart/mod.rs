//! Canonical account category classification.
//!
//! This module is the single owner of the account-type to category mapping.
//! Every other component (aggregator, summary, comparison) consumes it
//! instead of re-implementing the classification switch.

pub mod classification;

pub use classification::{AccountCategory, NormalBalance, describe_account};
