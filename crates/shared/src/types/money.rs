//! Money scale helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All monetary amounts are `rust_decimal::Decimal` quantized to a fixed
//! 2-decimal scale at the system boundary, matching the ledger store's
//! `decimal(18,2)` columns.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places for monetary amounts.
pub const MONEY_SCALE: u32 = 2;

/// Quantizes an amount to the money scale using Banker's Rounding.
///
/// Applied once at the Ledger Reader boundary so that aggregation and
/// validation downstream can compare amounts exactly, with zero epsilon.
#[must_use]
pub fn quantize(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount is already at (or below) the money scale.
#[must_use]
pub fn is_quantized(amount: Decimal) -> bool {
    amount == quantize(amount)
}
