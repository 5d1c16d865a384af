use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::{DerivedFrom, PriceChangeWindow, PriceEntry};

/// Final per-token record served to consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPrice {
    pub symbol: String,
    pub price_usd: f64,
    pub price_native: f64,
    pub depth: u32,
    pub derived_from: DerivedFrom,
    pub price_change_24h: Option<f64>,
    pub price_change_7d: Option<f64>,
    pub price_change_30d: Option<f64>,
    pub price_change_all: Option<f64>,
}

impl TokenPrice {
    pub fn from_entry(entry: PriceEntry, changes: PriceChangeWindow) -> Self {
        Self {
            symbol: entry.symbol,
            price_usd: entry.price_usd,
            price_native: entry.price_native,
            depth: entry.depth,
            derived_from: entry.derived_from,
            price_change_24h: changes.change_24h,
            price_change_7d: changes.change_7d,
            price_change_30d: changes.change_30d,
            price_change_all: changes.change_all,
        }
    }
}

/// Observability data about one engine run.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    /// Raw pool records received
    pub pair_count: usize,
    /// Usable edges after filtering
    pub edge_count: usize,
    /// Symbols present in the graph that no anchor could reach
    pub unpriced: Vec<String>,
}

/// Output of one engine run.
///
/// A symbol absent from `tokens` has no known price. A zero `price_usd`
/// means the anchor oracle was unavailable, not that the token is worthless.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceTable {
    pub anchor_symbol: String,
    pub anchor_price_usd: f64,
    pub anchor_change_24h: Option<f64>,
    pub tokens: BTreeMap<String, TokenPrice>,
    pub diagnostics: Diagnostics,
    pub computed_at: DateTime<Utc>,
}

impl PriceTable {
    pub fn get(&self, symbol: &str) -> Option<&TokenPrice> {
        self.tokens.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
