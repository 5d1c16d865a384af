//! Anchor resolver.
//!
//! Anchors are the only prices that do not come from pool ratios: the
//! native token priced by the external oracle, and stablecoins fixed at
//! their peg.

use log::warn;
use std::collections::BTreeMap;

use crate::models::AnchorPrice;
use crate::utils::{is_valid_price, normalize_symbol};

/// Price seeds for propagation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSet {
    native_symbol: String,
    native_price: AnchorPrice,
    /// Stablecoin symbol -> pegged USD price
    pegs: BTreeMap<String, f64>,
}

impl AnchorSet {
    /// Build the anchor set from the oracle quote and configured pegs.
    ///
    /// Symbols are normalized. Pegs that are not strictly positive are
    /// ignored. The native symbol is NEVER a stablecoin, even if it is listed
    /// as one.
    pub fn new(
        native_symbol: &str,
        native_price: AnchorPrice,
        pegs: &BTreeMap<String, f64>,
    ) -> Self {
        let native_symbol = normalize_symbol(native_symbol);

        let mut resolved = BTreeMap::new();
        for (symbol, peg) in pegs {
            let symbol = normalize_symbol(symbol);
            if symbol == native_symbol {
                warn!("Ignoring peg for native anchor {}", symbol);
                continue;
            }
            if !is_valid_price(*peg) {
                warn!("Ignoring invalid peg {} for {}", peg, symbol);
                continue;
            }
            resolved.insert(symbol, *peg);
        }

        let native_price = if native_price.price_usd.is_finite() && native_price.price_usd >= 0.0 {
            native_price
        } else {
            AnchorPrice::unavailable()
        };

        Self {
            native_symbol,
            native_price,
            pegs: resolved,
        }
    }

    pub fn native_symbol(&self) -> &str {
        &self.native_symbol
    }

    pub fn native_price(&self) -> AnchorPrice {
        self.native_price
    }

    /// Oracle USD price of the native anchor (0 if unavailable).
    pub fn native_price_usd(&self) -> f64 {
        self.native_price.price_usd
    }

    pub fn is_native(&self, symbol: &str) -> bool {
        self.native_symbol == symbol
    }

    pub fn is_stable(&self, symbol: &str) -> bool {
        self.pegs.contains_key(symbol)
    }

    /// Stablecoins and their pegs, in symbol order.
    pub fn pegs(&self) -> impl Iterator<Item = (&str, f64)> {
        self.pegs.iter().map(|(s, p)| (s.as_str(), *p))
    }
}
