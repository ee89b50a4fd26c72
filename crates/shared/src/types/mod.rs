//! Shared value types.

pub mod date_range;
pub mod money;

pub use date_range::DateRange;
pub use money::{MONEY_SCALE, quantize};
