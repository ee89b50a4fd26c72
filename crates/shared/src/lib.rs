//! Shared types and configuration for Loomledger.
//!
//! This crate provides common types used across the engine crates:
//! - Date range value type for report periods
//! - Money scale helpers with decimal precision
//! - Configuration management

pub mod config;
pub mod types;

pub use config::EngineConfig;
pub use types::{DateRange, MONEY_SCALE, quantize};
