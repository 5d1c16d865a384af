//! Type conversion utilities.
//!
//! Reserves come off-chain as unsigned big integers in the token's
//! smallest unit. They are scaled by `10^decimals` with BigDecimal so large
//! reserves keep their precision until the final f64 conversion.

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::ToPrimitive;

// ============================================
// Big Integer Conversions
// ============================================

/// Power of 10 as BigDecimal.
fn big_pow10(exp: u32) -> BigDecimal {
    BigDecimal::new(BigInt::from(1), -(exp as i64))
}

/// Convert a big-endian unsigned big integer to f64 with decimal adjustment.
///
/// An empty byte slice encodes zero.
///
/// # Returns
/// * `Some(f64)` if the adjusted value is finite, `None` otherwise
pub fn biguint_bytes_to_f64(bytes: &[u8], decimals: u8) -> Option<f64> {
    let value = BigUint::from_bytes_be(bytes);
    let big_value = BigDecimal::from(BigInt::from_biguint(Sign::Plus, value));

    let adjusted = big_value / big_pow10(decimals as u32);
    let result = adjusted.to_f64()?;

    if result.is_finite() {
        Some(result)
    } else {
        None
    }
}

/// Decode a big-endian u64 of at most 8 bytes. An empty slice is zero.
pub fn u64_from_be_bytes(bytes: &[u8]) -> Option<u64> {
    if bytes.len() > 8 {
        return None;
    }
    Some(bytes.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64))
}
