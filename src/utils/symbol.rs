//! Asset identifier normalization.
//!
//! On-chain asset identifiers are a ticker joined to a randomized tag
//! (`DGKO-CXVJ`, `USDT-1AB2`). Pricing is keyed by the bare ticker.

/// Separator between the ticker and the random tag of an asset identifier.
pub const SYMBOL_SEPARATOR: char = '-';

/// Reduce an asset identifier to its base symbol.
///
/// Leading/trailing whitespace is trimmed, everything from the first
/// separator onward is dropped and the result is upper-cased. Tickers are
/// upper case on-chain, but configuration keys may arrive lower-cased.
///
/// # Example
/// ```ignore
/// assert_eq!(normalize_symbol("DGKO-CXVJ"), "DGKO");
/// assert_eq!(normalize_symbol("KLV"), "KLV");
/// ```
pub fn normalize_symbol(identifier: &str) -> String {
    let trimmed = identifier.trim();
    match trimmed.split_once(SYMBOL_SEPARATOR) {
        Some((base, _)) => base.to_uppercase(),
        None => trimmed.to_uppercase(),
    }
}
