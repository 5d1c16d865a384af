//! Token price derivation engine.
//!
//! Pure, synchronous computation over already-fetched data:
//!
//! - [`graph`] - Pool records to usable edges
//! - [`anchors`] - Native anchor quote plus stablecoin pegs
//! - [`propagation`] - Two-phase bounded fixed-point price propagation
//! - [`price_changes`] - Outlier-robust windowed price changes
//! - [`assembler`] - Merge prices and changes into a [`PriceTable`]

pub mod anchors;
pub mod assembler;
pub mod graph;
pub mod price_changes;
pub mod propagation;

use chrono::{DateTime, Utc};

use crate::models::{PriceTable, RawPair, TradeRecord};

pub use anchors::AnchorSet;
pub use assembler::assemble;
pub use graph::build_pairs;
pub use price_changes::{calculate_price_changes, PriceChangeCalculator};
pub use propagation::{propagate, PriceMap, DEFAULT_ITERATION_CEILING};

/// Run the full engine: build edges, propagate prices, compute changes.
///
/// Never fails. Degenerate inputs (no pools, zero anchor price, no trades)
/// yield a partial or zeroed table. Calling it twice with the same inputs
/// returns the same table.
pub fn compute_price_table(
    raw_pairs: &[RawPair],
    anchors: &AnchorSet,
    trades: &[TradeRecord],
    iteration_ceiling: usize,
    now: DateTime<Utc>,
) -> PriceTable {
    let edges = build_pairs(raw_pairs);
    let prices = propagate(&edges, anchors, iteration_ceiling);
    let calculator = PriceChangeCalculator::new(anchors.native_symbol(), trades);

    assemble(raw_pairs.len(), &edges, prices, anchors, &calculator, now)
}
