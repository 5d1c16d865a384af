//! External collaborators feeding the engine.
//!
//! Each collaborator is a trait so the service can be driven by in-memory
//! sources in tests. HTTP implementations live in the submodules.

mod fetcher;
mod klever;
mod oracle;
mod trades;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::warn;

use crate::config::SourceSettings;
use crate::models::{AnchorPrice, RawPair, TradeRecord};

pub use fetcher::fetch_all_pairs;
pub use klever::{decode_pair_info, KleverPairSource, TokenDecimals};
pub use oracle::HttpAnchorPriceSource;
pub use trades::HttpTradeHistorySource;

/// Pool records by numeric pair id.
#[async_trait]
pub trait PairSource: Send + Sync {
    /// `Ok(None)` when no pair occupies this id.
    async fn fetch_pair(&self, pair_id: u64) -> Result<Option<RawPair>>;
}

/// USD quote for the native anchor token.
#[async_trait]
pub trait AnchorPriceSource: Send + Sync {
    async fn fetch_anchor_price(&self) -> Result<AnchorPrice>;
}

/// Recent swap records.
#[async_trait]
pub trait TradeHistorySource: Send + Sync {
    async fn fetch_trade_history(&self) -> Result<Vec<TradeRecord>>;
}

/// The set of collaborators a [`PriceService`](crate::PriceService) reads from.
#[derive(Clone)]
pub struct Sources {
    pub pairs: Arc<dyn PairSource>,
    pub oracle: Arc<dyn AnchorPriceSource>,
    pub trades: Option<Arc<dyn TradeHistorySource>>,
}

impl Sources {
    /// Build the HTTP-backed sources from configuration.
    pub fn from_settings(settings: &SourceSettings, native_symbol: &str) -> Result<Self> {
        let client = build_http_client(settings.request_timeout())?;

        if settings.dex_contract.is_empty() {
            warn!("No DEX contract configured; every pair slot will be empty");
        }

        let pairs = KleverPairSource::new(client.clone(), settings, native_symbol)
            .context("Failed to build pair source")?;
        let oracle = HttpAnchorPriceSource::new(
            client.clone(),
            &settings.oracle_url,
            &settings.oracle_coin_id,
        )
        .context("Failed to build oracle source")?;
        let trades = match &settings.trade_history_url {
            Some(url) => Some(Arc::new(
                HttpTradeHistorySource::new(client, url)
                    .context("Failed to build trade history source")?,
            ) as Arc<dyn TradeHistorySource>),
            None => None,
        };

        Ok(Self {
            pairs: Arc::new(pairs),
            oracle: Arc::new(oracle),
            trades,
        })
    }
}

/// Shared HTTP client with a per-request timeout.
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .context("Failed to create HTTP client")
}
