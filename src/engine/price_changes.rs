//! Outlier-robust price change windows.
//!
//! A token's price history is read only from its direct trades against the
//! native anchor. Each trade implies a price in anchor units. Per window the
//! first and last implied prices (by time) are compared, after dropping
//! trades outside an interquartile fence when the window is large enough.

use rustc_hash::FxHashMap;

use crate::models::{PriceChangeWindow, TradeRecord};
use crate::utils::{iqr_fence, is_valid_price, normalize_symbol, percentage_change};

pub const WINDOW_24H_SECS: i64 = 24 * 60 * 60;
pub const WINDOW_7D_SECS: i64 = 7 * WINDOW_24H_SECS;
pub const WINDOW_30D_SECS: i64 = 30 * WINDOW_24H_SECS;

/// Minimum priced trades in a window before IQR fencing applies.
const IQR_MIN_TRADES: usize = 4;

/// Fence width in IQRs on each side of the quartiles.
const IQR_FENCE_MULTIPLIER: f64 = 2.0;

/// Minimum trades needed to compare a first and a last price.
const MIN_TRADES: usize = 2;

/// Trade reduced to its time and implied price in anchor units.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PricedTrade {
    timestamp: i64,
    price: f64,
}

/// Per-symbol trade history against the anchor.
#[derive(Debug, Clone, Default)]
struct SymbolHistory {
    /// Successful trades against the anchor, priced or not
    relevant: usize,
    /// Priced trades, ascending by timestamp
    priced: Vec<PricedTrade>,
}

/// Indexes a trade history once and answers price change queries per symbol.
#[derive(Debug, Clone)]
pub struct PriceChangeCalculator {
    anchor_symbol: String,
    histories: FxHashMap<String, SymbolHistory>,
}

impl PriceChangeCalculator {
    /// Index successful trades whose pair is exactly `{symbol, anchor}`.
    ///
    /// Trade token identifiers are normalized the same way pool identifiers
    /// are. Sorting is stable, so trades sharing a timestamp keep their
    /// input order.
    pub fn new(anchor_symbol: &str, trades: &[TradeRecord]) -> Self {
        let anchor_symbol = normalize_symbol(anchor_symbol);
        let mut histories: FxHashMap<String, SymbolHistory> = FxHashMap::default();

        for trade in trades.iter().filter(|t| t.is_success()) {
            let input = normalize_symbol(&trade.input_token);
            let output = normalize_symbol(&trade.output_token);

            // Sold the token for the anchor: anchor out per token in.
            // Bought the token with the anchor: anchor in per token out.
            let (symbol, price) = if output == anchor_symbol && input != anchor_symbol {
                (input, trade.output_amount / trade.input_amount)
            } else if input == anchor_symbol && output != anchor_symbol {
                (output, trade.input_amount / trade.output_amount)
            } else {
                continue;
            };

            let history = histories.entry(symbol).or_default();
            history.relevant += 1;
            if is_valid_price(price) {
                history.priced.push(PricedTrade {
                    timestamp: trade.timestamp,
                    price,
                });
            }
        }

        for history in histories.values_mut() {
            history.priced.sort_by_key(|t| t.timestamp);
        }

        Self {
            anchor_symbol,
            histories,
        }
    }

    pub fn anchor_symbol(&self) -> &str {
        &self.anchor_symbol
    }

    /// Price changes for `symbol` as of `now` (unix seconds).
    ///
    /// All windows are `None` when fewer than two relevant trades exist.
    pub fn changes_for(&self, symbol: &str, now: i64) -> PriceChangeWindow {
        let Some(history) = self.histories.get(symbol) else {
            return PriceChangeWindow::empty();
        };
        if history.relevant < MIN_TRADES {
            return PriceChangeWindow::empty();
        }

        let trades = &history.priced;
        PriceChangeWindow {
            change_24h: window_change(trades, Some(now - WINDOW_24H_SECS)),
            change_7d: window_change(trades, Some(now - WINDOW_7D_SECS)),
            change_30d: window_change(trades, Some(now - WINDOW_30D_SECS)),
            change_all: window_change(trades, None),
        }
    }
}

/// Clamped percentage change across the trades at or after `since`.
fn window_change(trades: &[PricedTrade], since: Option<i64>) -> Option<f64> {
    let in_window: Vec<PricedTrade> = trades
        .iter()
        .filter(|t| since.map_or(true, |s| t.timestamp >= s))
        .copied()
        .collect();

    if in_window.len() < MIN_TRADES {
        return None;
    }

    let kept = if in_window.len() >= IQR_MIN_TRADES {
        let prices: Vec<f64> = in_window.iter().map(|t| t.price).collect();
        let (low, high) = iqr_fence(&prices, IQR_FENCE_MULTIPLIER)?;
        in_window
            .into_iter()
            .filter(|t| t.price >= low && t.price <= high)
            .collect()
    } else {
        in_window
    };

    if kept.len() < MIN_TRADES {
        return None;
    }

    let first = kept.first()?;
    let last = kept.last()?;
    percentage_change(first.price, last.price)
}

/// One-shot price changes for a single symbol.
pub fn calculate_price_changes(
    symbol: &str,
    anchor_symbol: &str,
    trades: &[TradeRecord],
    now: i64,
) -> PriceChangeWindow {
    PriceChangeCalculator::new(anchor_symbol, trades).changes_for(&normalize_symbol(symbol), now)
}
