//! Pair graph builder.
//!
//! Turns raw pool records into the edge list the propagation engine walks.
//! Output order mirrors input order. That order is observable: within a
//! propagation pass edges are visited in list order and the first edge to
//! price a token wins, so it decides `derived_from` when several
//! neighbours could price the same token.

use log::debug;

use crate::models::{Pair, RawPair};
use crate::utils::{is_valid_price, normalize_symbol};

/// Build usable edges from raw pool records.
///
/// A record is kept only if it is active and both reserves are strictly
/// positive and finite. Identifiers are reduced to base symbols. Records
/// with an empty symbol or with the same symbol on both sides are dropped.
pub fn build_pairs(raw_pairs: &[RawPair]) -> Vec<Pair> {
    let edges: Vec<Pair> = raw_pairs.iter().filter_map(to_edge).collect();

    debug!(
        "Built {} edges from {} pool records",
        edges.len(),
        raw_pairs.len()
    );

    edges
}

fn to_edge(raw: &RawPair) -> Option<Pair> {
    if !raw.is_active || !is_valid_price(raw.reserve_a) || !is_valid_price(raw.reserve_b) {
        return None;
    }

    let token_a = normalize_symbol(&raw.token_a);
    let token_b = normalize_symbol(&raw.token_b);

    if token_a.is_empty() || token_b.is_empty() || token_a == token_b {
        return None;
    }

    Some(Pair {
        pair_id: raw.pair_id,
        token_a,
        token_b,
        reserve_a: raw.reserve_a,
        reserve_b: raw.reserve_b,
        fee_percent: raw.fee_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: u64, a: &str, b: &str, ra: f64, rb: f64, active: bool) -> RawPair {
        RawPair {
            pair_id: id,
            token_a: a.to_string(),
            token_b: b.to_string(),
            reserve_a: ra,
            reserve_b: rb,
            is_active: active,
            fee_percent: 1,
        }
    }

    #[test]
    fn test_discards_inactive_and_empty_pools() {
        let pairs = vec![
            raw(1, "KLV", "DGKO-CXVJ", 100.0, 50.0, true),
            raw(2, "KLV", "KFI-AB12", 100.0, 50.0, false),
            raw(3, "KLV", "BABYDGKO-XX", 0.0, 50.0, true),
            raw(4, "KLV", "USDT-99", 100.0, -1.0, true),
            raw(5, "KLV", "NAN", f64::NAN, 1.0, true),
        ];
        let edges = build_pairs(&pairs);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].pair_id, 1);
        assert_eq!(edges[0].token_b, "DGKO");
    }

    #[test]
    fn test_preserves_input_order() {
        let pairs = vec![
            raw(7, "B", "C", 1.0, 1.0, true),
            raw(3, "KLV", "A", 1.0, 1.0, true),
            raw(5, "A", "B", 1.0, 1.0, true),
        ];
        let ids: Vec<u64> = build_pairs(&pairs).iter().map(|p| p.pair_id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn test_drops_self_pairs() {
        let pairs = vec![raw(1, "DGKO-AAAA", "DGKO-BBBB", 1.0, 1.0, true)];
        assert!(build_pairs(&pairs).is_empty());
    }
}
