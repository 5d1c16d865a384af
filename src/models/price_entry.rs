use serde::{Serialize, Serializer};

/// Where a token's price came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerivedFrom {
    /// The native anchor itself (oracle price).
    Anchor,
    /// A configured stablecoin peg.
    Peg,
    /// Derived from the reserve ratio against this neighbour.
    Token(String),
}

impl Serialize for DerivedFrom {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DerivedFrom::Anchor => serializer.serialize_str("anchor"),
            DerivedFrom::Peg => serializer.serialize_str("peg"),
            DerivedFrom::Token(symbol) => serializer.serialize_str(symbol),
        }
    }
}

/// Propagation state for one token.
///
/// Written once, the first time the token is priced, and never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    pub symbol: String,
    pub price_usd: f64,
    pub price_native: f64,
    /// Hops from the nearest anchor (diagnostic only)
    pub depth: u32,
    pub derived_from: DerivedFrom,
}

impl PriceEntry {
    pub fn new(
        symbol: impl Into<String>,
        price_usd: f64,
        anchor_price_usd: f64,
        depth: u32,
        derived_from: DerivedFrom,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            price_usd,
            price_native: native_price(price_usd, anchor_price_usd),
            depth,
            derived_from,
        }
    }
}

/// USD price expressed in anchor units; 0 when the anchor price is unknown.
fn native_price(price_usd: f64, anchor_price_usd: f64) -> f64 {
    if anchor_price_usd > 0.0 {
        price_usd / anchor_price_usd
    } else {
        0.0
    }
}
