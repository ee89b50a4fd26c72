//! Read-only access to posted journal data.
//!
//! The journal-entry and chart-of-accounts subsystems own the data; this
//! module only defines the read contract the engine needs:
//! - Raw journal line and chart metadata types
//! - The `LedgerReader` trait (injected into the calculator)
//! - An in-memory implementation for tests and embedded use

pub mod memory;
pub mod reader;

pub use memory::InMemoryLedger;
pub use reader::{AccountRef, JournalLine, LedgerReadError, LedgerReader};
