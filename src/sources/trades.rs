use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::TradeHistorySource;
use crate::models::TradeRecord;

/// Accepts both a bare array and `{"trades": [...]}`.
///
/// Records are decoded one by one so a malformed record is dropped without
/// losing the rest of the history.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TradeHistoryResponse {
    List(Vec<Value>),
    Wrapped { trades: Vec<Value> },
}

impl TradeHistoryResponse {
    fn into_trades(self) -> Vec<TradeRecord> {
        let records = match self {
            TradeHistoryResponse::List(records) => records,
            TradeHistoryResponse::Wrapped { trades } => trades,
        };

        let total = records.len();
        let trades: Vec<TradeRecord> = records
            .into_iter()
            .filter_map(|record| serde_json::from_value(record).ok())
            .collect();

        if trades.len() < total {
            debug!("Discarded {} malformed trade records", total - trades.len());
        }
        trades
    }
}

/// Swap history served as JSON over HTTP.
#[derive(Clone)]
pub struct HttpTradeHistorySource {
    client: reqwest::Client,
    url: Url,
}

impl HttpTradeHistorySource {
    pub fn new(client: reqwest::Client, url: &str) -> Result<Self> {
        Ok(Self {
            client,
            url: Url::parse(url).context("Invalid trade history URL")?,
        })
    }
}

#[async_trait]
impl TradeHistorySource for HttpTradeHistorySource {
    async fn fetch_trade_history(&self) -> Result<Vec<TradeRecord>> {
        let response: TradeHistoryResponse = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .context("Trade history request failed")?
            .error_for_status()
            .context("Trade history returned error status")?
            .json()
            .await
            .context("Invalid trade history response")?;

        Ok(response.into_trades())
    }
}
