use serde::{Deserialize, Serialize};

/// Settlement status of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Success,
    Failed,
    Pending,
    #[serde(other)]
    Unknown,
}

/// Swap record consumed from the trade history source.
///
/// Amounts are decimal-adjusted; `timestamp` is in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub timestamp: i64,
    pub status: TradeStatus,
    pub input_token: String,
    pub output_token: String,
    pub input_amount: f64,
    pub output_amount: f64,
}

impl TradeRecord {
    pub fn is_success(&self) -> bool {
        self.status == TradeStatus::Success
    }
}
