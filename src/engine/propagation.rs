//! Two-phase bounded fixed-point price propagation.
//!
//! Phase 1 seeds the native anchor and relaxes over every edge that does not
//! touch a stablecoin. Phase 2 seeds the stablecoins that appear in the
//! graph at their peg and relaxes over the full edge list, filling in
//! tokens Phase 1 could not reach.
//!
//! Relaxation rules:
//! - A token is "known" once it has an entry in the table, whatever its
//!   price. A zero price (oracle down) still propagates, so depth and
//!   `derived_from` stay meaningful.
//! - Sources are limited to the current phase's roots: the native anchor and
//!   tokens priced from it in Phase 1, the pegs and tokens priced from them
//!   in Phase 2. Phase 1 tokens never extend their chain in Phase 2, so each
//!   phase reaches at most `ceiling` hops from its own seeds.
//! - Only tokens rooted at the start of a pass act as sources in that pass.
//!   Each pass therefore extends the priced set by exactly one hop.
//! - An entry is never overwritten, within a pass or across phases. When
//!   several edges could price a token in the same pass, the first one in
//!   edge-list order wins.

use log::debug;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::engine::AnchorSet;
use crate::models::{DerivedFrom, Pair, PriceEntry};

/// Default number of relaxation passes per phase.
pub const DEFAULT_ITERATION_CEILING: usize = 10;

/// Symbol -> price entry.
pub type PriceMap = FxHashMap<String, PriceEntry>;

/// Propagate anchor prices across the pair graph.
///
/// The native anchor is always present in the result (depth 0). A token
/// with no path to any anchor within `iteration_ceiling` hops is absent.
/// A ceiling of 0 is treated as 1.
pub fn propagate(edges: &[Pair], anchors: &AnchorSet, iteration_ceiling: usize) -> PriceMap {
    let ceiling = iteration_ceiling.max(1);
    let anchor_usd = anchors.native_price_usd();
    let mut prices = PriceMap::default();

    // Phase 1: native anchor, stablecoin edges excluded
    let native = anchors.native_symbol();
    prices.insert(
        native.to_string(),
        PriceEntry::new(native, anchor_usd, anchor_usd, 0, DerivedFrom::Anchor),
    );
    let mut native_roots: FxHashSet<String> = FxHashSet::default();
    native_roots.insert(native.to_string());
    let native_passes = relax(&mut prices, native_roots, edges, anchors, ceiling, true);

    // Phase 2: stablecoin pegs over the full edge list
    let mut peg_roots: FxHashSet<String> = FxHashSet::default();
    for (symbol, peg) in anchors.pegs() {
        if prices.contains_key(symbol) || !edges.iter().any(|e| e.contains(symbol)) {
            continue;
        }
        prices.insert(
            symbol.to_string(),
            PriceEntry::new(symbol, peg, anchor_usd, 0, DerivedFrom::Peg),
        );
        peg_roots.insert(symbol.to_string());
    }
    let seeded = peg_roots.len();
    let peg_passes = if seeded > 0 {
        relax(&mut prices, peg_roots, edges, anchors, ceiling, false)
    } else {
        0
    };

    debug!(
        "Propagation priced {} tokens ({} native passes, {} pegs, {} peg passes)",
        prices.len(),
        native_passes,
        seeded,
        peg_passes
    );

    prices
}

/// Run relaxation passes from `roots` until one prices nothing or the
/// ceiling is hit.
///
/// Returns the number of passes that priced at least one token.
fn relax(
    prices: &mut PriceMap,
    mut roots: FxHashSet<String>,
    edges: &[Pair],
    anchors: &AnchorSet,
    ceiling: usize,
    skip_stable: bool,
) -> usize {
    let anchor_usd = anchors.native_price_usd();
    let mut productive = 0;

    for pass in 1..=ceiling {
        // Tokens priced during this pass; roots only from the next pass on
        let mut fresh: Vec<String> = Vec::new();

        for edge in edges {
            if skip_stable && (anchors.is_stable(&edge.token_a) || anchors.is_stable(&edge.token_b))
            {
                continue;
            }

            let known = match (roots.contains(&edge.token_a), roots.contains(&edge.token_b)) {
                (true, false) => edge.token_a.as_str(),
                (false, true) => edge.token_b.as_str(),
                _ => continue,
            };
            let Some(unknown) = edge.other(known) else {
                continue;
            };

            // Priced earlier, in this pass or by another root
            if prices.contains_key(unknown) {
                continue;
            }

            let Some(source) = prices.get(known) else {
                continue;
            };
            let (source_usd, source_depth) = (source.price_usd, source.depth);

            // Units of `known` per 1 `unknown`
            let Some(price_in_known) = edge.price_of(unknown) else {
                continue;
            };
            let price_usd = price_in_known * source_usd;
            if !price_usd.is_finite() {
                continue;
            }

            prices.insert(
                unknown.to_string(),
                PriceEntry::new(
                    unknown,
                    price_usd,
                    anchor_usd,
                    source_depth + 1,
                    DerivedFrom::Token(known.to_string()),
                ),
            );
            fresh.push(unknown.to_string());
        }

        debug!("Pass {} priced {} tokens", pass, fresh.len());

        if fresh.is_empty() {
            break;
        }
        roots.extend(fresh);
        productive += 1;
    }

    productive
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnchorPrice;
    use std::collections::BTreeMap;

    fn edge(id: u64, a: &str, b: &str, ra: f64, rb: f64) -> Pair {
        Pair {
            pair_id: id,
            token_a: a.to_string(),
            token_b: b.to_string(),
            reserve_a: ra,
            reserve_b: rb,
            fee_percent: 1,
        }
    }

    fn anchors(price: f64) -> AnchorSet {
        let mut pegs = BTreeMap::new();
        pegs.insert("USDT".to_string(), 1.0);
        AnchorSet::new("KLV", AnchorPrice::new(price, None), &pegs)
    }

    /// KLV - T1 - T2 - ... - T{hops}, all 1:1
    fn chain(hops: usize) -> Vec<Pair> {
        (1..=hops)
            .map(|i| {
                let prev = if i == 1 {
                    "KLV".to_string()
                } else {
                    format!("T{}", i - 1)
                };
                edge(i as u64, &prev, &format!("T{}", i), 1.0, 1.0)
            })
            .collect()
    }

    #[test]
    fn test_chain_within_ceiling_fully_priced() {
        let prices = propagate(&chain(10), &anchors(2.0), 10);
        assert_eq!(prices.len(), 11);
        assert_eq!(prices["T10"].depth, 10);
        assert_eq!(prices["T10"].price_usd, 2.0);
    }

    #[test]
    fn test_chain_beyond_ceiling_leaves_tail_unpriced() {
        let prices = propagate(&chain(11), &anchors(2.0), 10);
        assert!(prices.contains_key("T10"));
        assert!(!prices.contains_key("T11"));
    }

    #[test]
    fn test_unrelated_stablecoin_pool_keeps_ceiling() {
        let mut edges = chain(11);
        edges.push(edge(99, "USDT", "FOO", 1.0, 1.0));
        let prices = propagate(&edges, &anchors(2.0), 10);

        assert!(prices.contains_key("T10"));
        assert!(!prices.contains_key("T11"));
        assert_eq!(prices["FOO"].depth, 1);
        assert_eq!(prices["FOO"].derived_from, DerivedFrom::Token("USDT".into()));
    }

    #[test]
    fn test_peg_phase_reaches_only_from_pegs() {
        // T3 is cut off at ceiling 2 from KLV; USDT reaches it in one hop
        let mut edges = chain(3);
        edges.push(edge(10, "USDT", "T3", 1.0, 1.0));
        let prices = propagate(&edges, &anchors(2.0), 2);

        let t3 = &prices["T3"];
        assert_eq!(t3.price_usd, 1.0);
        assert_eq!(t3.depth, 1);
        assert_eq!(t3.derived_from, DerivedFrom::Token("USDT".into()));
    }

    #[test]
    fn test_one_hop_per_pass_regardless_of_edge_order() {
        // Edges listed in path order would otherwise price the whole chain in one pass
        let prices = propagate(&chain(3), &anchors(2.0), 2);
        assert!(prices.contains_key("T2"));
        assert!(!prices.contains_key("T3"));

        let mut reversed = chain(3);
        reversed.reverse();
        let prices = propagate(&reversed, &anchors(2.0), 2);
        assert!(prices.contains_key("T2"));
        assert!(!prices.contains_key("T3"));
    }

    #[test]
    fn test_stablecoin_keeps_peg() {
        // Skewed pool would imply USDT = 1000/10 * 2 = $200
        let edges = vec![edge(1, "KLV", "USDT", 1000.0, 10.0)];
        let prices = propagate(&edges, &anchors(2.0), 10);

        let usdt = &prices["USDT"];
        assert_eq!(usdt.price_usd, 1.0);
        assert_eq!(usdt.depth, 0);
        assert_eq!(usdt.derived_from, DerivedFrom::Peg);
        assert_eq!(usdt.price_native, 0.5);
    }

    #[test]
    fn test_stablecoin_edges_ignored_in_native_phase() {
        // A is reachable from KLV directly and from USDT; the native path wins
        let edges = vec![
            edge(1, "USDT", "A", 10.0, 1.0),
            edge(2, "KLV", "A", 4.0, 1.0),
        ];
        let prices = propagate(&edges, &anchors(2.0), 10);

        let a = &prices["A"];
        assert_eq!(a.price_usd, 8.0);
        assert_eq!(a.derived_from, DerivedFrom::Token("KLV".into()));
    }

    #[test]
    fn test_stablecoin_fallback_phase() {
        let edges = vec![
            edge(1, "KLV", "A", 100.0, 50.0),
            edge(2, "B", "USDT", 10.0, 20.0),
            edge(3, "C", "B", 1.0, 3.0),
        ];
        let prices = propagate(&edges, &anchors(2.0), 10);

        let b = &prices["B"];
        assert_eq!(b.price_usd, 2.0);
        assert_eq!(b.depth, 1);
        assert_eq!(b.derived_from, DerivedFrom::Token("USDT".into()));
        assert_eq!(b.price_native, 1.0);

        let c = &prices["C"];
        assert_eq!(c.price_usd, 6.0);
        assert_eq!(c.depth, 2);
    }

    #[test]
    fn test_unused_stablecoin_not_seeded() {
        let edges = vec![edge(1, "KLV", "A", 1.0, 1.0)];
        let prices = propagate(&edges, &anchors(2.0), 10);
        assert!(!prices.contains_key("USDT"));
        assert_eq!(prices.len(), 2);
    }

    #[test]
    fn test_first_writer_wins_across_passes() {
        // A priced in pass 1 at $4 directly from KLV. In pass 2, the
        // KLV-B-A route would re-derive A at 1/1 * $20 = $20.
        let edges = vec![
            edge(1, "KLV", "B", 10.0, 1.0),
            edge(2, "B", "A", 1.0, 1.0),
            edge(3, "KLV", "A", 2.0, 1.0),
        ];
        let prices = propagate(&edges, &anchors(2.0), 10);

        let a = &prices["A"];
        assert_eq!(a.price_usd, 4.0);
        assert_eq!(a.depth, 1);
        assert_eq!(a.derived_from, DerivedFrom::Token("KLV".into()));
    }

    #[test]
    fn test_first_writer_wins_within_pass() {
        // Z is two hops away through both X and Y; edge order picks X
        let edges = vec![
            edge(1, "KLV", "X", 1.0, 1.0),
            edge(2, "KLV", "Y", 3.0, 1.0),
            edge(3, "X", "Z", 1.0, 1.0),
            edge(4, "Y", "Z", 1.0, 1.0),
        ];
        let prices = propagate(&edges, &anchors(1.0), 10);
        assert_eq!(prices["Z"].price_usd, 1.0);
        assert_eq!(prices["Z"].derived_from, DerivedFrom::Token("X".into()));

        let mut swapped = edges.clone();
        swapped.swap(2, 3);
        let prices = propagate(&swapped, &anchors(1.0), 10);
        assert_eq!(prices["Z"].price_usd, 3.0);
        assert_eq!(prices["Z"].derived_from, DerivedFrom::Token("Y".into()));
    }

    #[test]
    fn test_cycle_terminates() {
        let edges = vec![
            edge(1, "KLV", "A", 1.0, 1.0),
            edge(2, "A", "B", 1.0, 2.0),
            edge(3, "B", "A", 5.0, 1.0),
            edge(4, "B", "KLV", 1.0, 1.0),
        ];
        let prices = propagate(&edges, &anchors(1.0), 10);
        assert_eq!(prices.len(), 3);
        assert_eq!(prices["KLV"].derived_from, DerivedFrom::Anchor);
    }

    #[test]
    fn test_disconnected_component_absent() {
        let edges = vec![edge(1, "KLV", "A", 1.0, 1.0), edge(2, "P", "Q", 1.0, 1.0)];
        let prices = propagate(&edges, &anchors(1.0), 10);
        assert!(!prices.contains_key("P"));
        assert!(!prices.contains_key("Q"));
    }

    #[test]
    fn test_zero_ceiling_treated_as_one() {
        let prices = propagate(&chain(2), &anchors(1.0), 0);
        assert!(prices.contains_key("T1"));
        assert!(!prices.contains_key("T2"));
    }
}
