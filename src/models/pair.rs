use serde::{Deserialize, Serialize};

/// Pool record as returned by the pair source.
///
/// Token identifiers are raw on-chain identifiers (not yet normalized) and
/// reserves are already scaled by each token's decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPair {
    pub pair_id: u64,
    pub token_a: String,
    pub token_b: String,
    pub reserve_a: f64,
    pub reserve_b: f64,
    pub is_active: bool,
    #[serde(default)]
    pub fee_percent: u64,
}

/// Usable graph edge between two normalized token symbols.
///
/// Only constructed by the pair graph builder, which guarantees the pool is
/// active and both reserves are strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pair {
    pub pair_id: u64,
    pub token_a: String,
    pub token_b: String,
    pub reserve_a: f64,
    pub reserve_b: f64,
    pub fee_percent: u64,
}

impl Pair {
    /// Whether `symbol` is one of the two sides of this pool.
    pub fn contains(&self, symbol: &str) -> bool {
        self.token_a == symbol || self.token_b == symbol
    }

    /// The side opposite to `symbol`, if `symbol` is in this pool.
    pub fn other(&self, symbol: &str) -> Option<&str> {
        if self.token_a == symbol {
            Some(&self.token_b)
        } else if self.token_b == symbol {
            Some(&self.token_a)
        } else {
            None
        }
    }

    /// Units of the opposite token one unit of `symbol` is worth.
    ///
    /// price_of(A) = reserve_b / reserve_a (B per 1 A)
    pub fn price_of(&self, symbol: &str) -> Option<f64> {
        if self.token_a == symbol {
            Some(self.reserve_b / self.reserve_a)
        } else if self.token_b == symbol {
            Some(self.reserve_a / self.reserve_b)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> Pair {
        Pair {
            pair_id: 1,
            token_a: "KLV".to_string(),
            token_b: "DGKO".to_string(),
            reserve_a: 100.0,
            reserve_b: 50.0,
            fee_percent: 1,
        }
    }

    #[test]
    fn test_price_of_each_side() {
        let p = pair();
        // 1 DGKO is worth 2 KLV
        assert_eq!(p.price_of("DGKO"), Some(2.0));
        assert_eq!(p.price_of("KLV"), Some(0.5));
        assert_eq!(p.price_of("USDT"), None);
    }

    #[test]
    fn test_other_side() {
        let p = pair();
        assert_eq!(p.other("KLV"), Some("DGKO"));
        assert_eq!(p.other("DGKO"), Some("KLV"));
        assert!(p.other("USDT").is_none());
        assert!(p.contains("KLV") && !p.contains("USDT"));
    }
}
