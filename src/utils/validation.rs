//! Numeric guards used by the price engine.
//!
//! Percentage changes are bounded. An illiquid token whose first trade
//! printed at a near-zero price would otherwise report swings in the
//! thousands of percent.

// ============================================
// Price Change Bounds
// ============================================

/// Largest reportable percentage gain.
pub const MAX_PRICE_CHANGE_PCT: f64 = 999.99;

/// Largest reportable percentage loss.
pub const MIN_PRICE_CHANGE_PCT: f64 = -99.99;

// ============================================
// Helpers
// ============================================

/// A price usable as a ratio input: finite and strictly positive.
#[inline]
pub fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Clamp a percentage into `[MIN_PRICE_CHANGE_PCT, MAX_PRICE_CHANGE_PCT]`.
#[inline]
pub fn clamp_percentage(pct: f64) -> f64 {
    pct.clamp(MIN_PRICE_CHANGE_PCT, MAX_PRICE_CHANGE_PCT)
}

/// Clamped percentage change from `first` to `last`.
///
/// Returns `None` if `first` is not a valid price or the result is not finite.
#[inline]
pub fn percentage_change(first: f64, last: f64) -> Option<f64> {
    if !is_valid_price(first) {
        return None;
    }
    let pct = (last - first) / first * 100.0;
    if pct.is_finite() {
        Some(clamp_percentage(pct))
    } else {
        None
    }
}
