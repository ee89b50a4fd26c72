//! Trial balance calculation and caching engine for Loomledger.
//!
//! This crate aggregates posted double-entry journal data into verified,
//! cached financial snapshots. It contains pure business logic with ZERO web
//! or database dependencies; the ledger read path is injected behind a trait.
//!
//! # Modules
//!
//! - `chart` - Canonical account category classification
//! - `ledger` - Read-only access to posted journal lines
//! - `trial_balance` - Calculation, caching, auditing, and period comparison
//! - `summary` - Dashboard-level balance summary

pub mod chart;
pub mod ledger;
pub mod summary;
pub mod trial_balance;
