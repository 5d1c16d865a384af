//! Utility functions for the price engine.
//!
//! This module is organized into focused submodules:
//!
//! - [`symbol`] - Asset identifier normalization
//! - [`conversion`] - Raw on-chain integers to decimal-scaled f64
//! - [`validation`] - Numeric guards and percentage clamping
//! - [`stats`] - Index-based quantiles and IQR fencing

mod conversion;
mod stats;
mod symbol;
mod validation;

// ============================================
// Re-exports
// ============================================

// Symbol utilities
pub use symbol::{normalize_symbol, SYMBOL_SEPARATOR};

// Conversion utilities
pub use conversion::{biguint_bytes_to_f64, u64_from_be_bytes};

// Validation utilities
pub use validation::{
    clamp_percentage, is_valid_price, percentage_change, MAX_PRICE_CHANGE_PCT,
    MIN_PRICE_CHANGE_PCT,
};

// Statistics utilities
pub use stats::{iqr_fence, quantile_at};
