//! Result assembler.
//!
//! Joins propagated prices with per-token price changes and collects
//! diagnostics about the graph.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::engine::{AnchorSet, PriceChangeCalculator, PriceMap};
use crate::models::{Diagnostics, Pair, PriceChangeWindow, PriceTable, TokenPrice};

/// Build the final price table.
///
/// The native anchor's 24h change comes from the oracle quote, since it has
/// no trades against itself. Every other token's changes come from its
/// trades against the anchor.
pub fn assemble(
    pair_count: usize,
    edges: &[Pair],
    prices: PriceMap,
    anchors: &AnchorSet,
    calculator: &PriceChangeCalculator,
    now: DateTime<Utc>,
) -> PriceTable {
    let now_secs = now.timestamp();
    let anchor_quote = anchors.native_price();

    let unpriced: Vec<String> = edges
        .iter()
        .flat_map(|e| [e.token_a.as_str(), e.token_b.as_str()])
        .filter(|symbol| !prices.contains_key(*symbol))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let tokens: BTreeMap<String, TokenPrice> = prices
        .into_iter()
        .map(|(symbol, entry)| {
            let changes = if anchors.is_native(&symbol) {
                PriceChangeWindow {
                    change_24h: anchor_quote.price_change_24h,
                    ..PriceChangeWindow::empty()
                }
            } else {
                calculator.changes_for(&symbol, now_secs)
            };
            (symbol, TokenPrice::from_entry(entry, changes))
        })
        .collect();

    PriceTable {
        anchor_symbol: anchors.native_symbol().to_string(),
        anchor_price_usd: anchor_quote.price_usd,
        anchor_change_24h: anchor_quote.price_change_24h,
        tokens,
        diagnostics: Diagnostics {
            pair_count,
            edge_count: edges.len(),
            unpriced,
        },
        computed_at: now,
    }
}
