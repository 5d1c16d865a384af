use serde::{Deserialize, Serialize};

/// External USD quote for the native anchor token.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorPrice {
    pub price_usd: f64,
    pub price_change_24h: Option<f64>,
}

impl AnchorPrice {
    pub fn new(price_usd: f64, price_change_24h: Option<f64>) -> Self {
        Self {
            price_usd,
            price_change_24h,
        }
    }

    /// Degraded quote used when the oracle cannot be reached.
    ///
    /// Propagation still runs against it and yields zero USD prices.
    pub fn unavailable() -> Self {
        Self::default()
    }
}
