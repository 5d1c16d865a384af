//! Price service.
//!
//! Fetches the engine's inputs concurrently, runs the engine and keeps the
//! latest table in the output cache. Collaborator failures degrade the
//! result instead of failing the refresh:
//!
//! - pair fetch failure -> that pair is missing
//! - oracle failure -> anchor priced at 0
//! - trade history failure -> no price changes

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use log::{info, warn};

use crate::cache::{MokaPriceCache, PriceCache};
use crate::config::{EngineSettings, Settings};
use crate::engine::{compute_price_table, AnchorSet};
use crate::models::{AnchorPrice, PriceTable, RawPair, TradeRecord};
use crate::sources::{fetch_all_pairs, Sources};

/// Cache key under which the latest price table is stored.
pub const PRICE_TABLE_CACHE_KEY: &str = "token_prices";

pub struct PriceService {
    sources: Sources,
    cache: Arc<dyn PriceCache>,
    engine: EngineSettings,
    max_pair_slots: u64,
    request_timeout: Duration,
    cache_ttl: Duration,
}

impl PriceService {
    pub fn new(sources: Sources, cache: Arc<dyn PriceCache>, settings: &Settings) -> Self {
        Self {
            sources,
            cache,
            engine: settings.engine.clone(),
            max_pair_slots: settings.sources.max_pair_slots,
            request_timeout: settings.sources.request_timeout(),
            cache_ttl: settings.cache.ttl(),
        }
    }

    /// Build the service with HTTP sources and an in-process cache.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let sources = Sources::from_settings(&settings.sources, &settings.engine.native_symbol)?;
        let cache = Arc::new(MokaPriceCache::from_settings(&settings.cache));
        Ok(Self::new(sources, cache, settings))
    }

    /// Latest price table, served from cache unless `force_refresh` is set.
    pub async fn get_prices(&self, force_refresh: bool) -> Arc<PriceTable> {
        if !force_refresh {
            if let Some(cached) = self.cache.get(PRICE_TABLE_CACHE_KEY).await {
                return cached;
            }
        }

        let table = Arc::new(self.compute().await);
        self.cache
            .set(PRICE_TABLE_CACHE_KEY, table.clone(), self.cache_ttl)
            .await;
        table
    }

    /// Recompute and re-cache, ignoring any cached table.
    pub async fn refresh(&self) -> Arc<PriceTable> {
        self.get_prices(true).await
    }

    async fn compute(&self) -> PriceTable {
        let start = Instant::now();

        let (raw_pairs, anchor_price, trades) =
            tokio::join!(self.fetch_pairs(), self.fetch_anchor(), self.fetch_trades());

        let anchors = AnchorSet::new(
            &self.engine.native_symbol,
            anchor_price,
            &self.engine.stablecoins,
        );
        let table = compute_price_table(
            &raw_pairs,
            &anchors,
            &trades,
            self.engine.iteration_ceiling,
            Utc::now(),
        );

        info!(
            "Computed prices in {:?} ({} tokens, {} edges, {} unpriced, {} = ${})",
            start.elapsed(),
            table.len(),
            table.diagnostics.edge_count,
            table.diagnostics.unpriced.len(),
            table.anchor_symbol,
            table.anchor_price_usd
        );

        table
    }

    async fn fetch_pairs(&self) -> Vec<RawPair> {
        fetch_all_pairs(
            self.sources.pairs.as_ref(),
            self.max_pair_slots,
            self.request_timeout,
        )
        .await
    }

    async fn fetch_anchor(&self) -> AnchorPrice {
        match tokio::time::timeout(
            self.request_timeout,
            self.sources.oracle.fetch_anchor_price(),
        )
        .await
        {
            Ok(Ok(price)) => price,
            Ok(Err(e)) => {
                warn!("Anchor oracle unavailable, pricing at 0: {:#}", e);
                AnchorPrice::unavailable()
            },
            Err(_) => {
                warn!("Anchor oracle timed out, pricing at 0");
                AnchorPrice::unavailable()
            },
        }
    }

    async fn fetch_trades(&self) -> Vec<TradeRecord> {
        let Some(source) = &self.sources.trades else {
            return Vec::new();
        };

        match tokio::time::timeout(self.request_timeout, source.fetch_trade_history()).await {
            Ok(Ok(trades)) => trades,
            Ok(Err(e)) => {
                warn!("Trade history unavailable, skipping price changes: {:#}", e);
                Vec::new()
            },
            Err(_) => {
                warn!("Trade history timed out, skipping price changes");
                Vec::new()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DerivedFrom, TradeStatus};
    use crate::sources::{AnchorPriceSource, PairSource, TradeHistorySource};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticPairs;

    #[async_trait]
    impl PairSource for StaticPairs {
        async fn fetch_pair(&self, pair_id: u64) -> Result<Option<RawPair>> {
            let pair = |a: &str, b: &str, ra: f64, rb: f64| RawPair {
                pair_id,
                token_a: a.to_string(),
                token_b: b.to_string(),
                reserve_a: ra,
                reserve_b: rb,
                is_active: true,
                fee_percent: 1,
            };
            match pair_id {
                1 => Ok(Some(pair("KLV", "X-AB12", 100.0, 50.0))),
                2 => Err(anyhow!("node unavailable")),
                3 => Ok(Some(pair("X-AB12", "Y-CD34", 10.0, 5.0))),
                _ => Ok(None),
            }
        }
    }

    struct Oracle {
        price: Option<f64>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl AnchorPriceSource for Oracle {
        async fn fetch_anchor_price(&self) -> Result<AnchorPrice> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.price
                .map(|p| AnchorPrice::new(p, Some(1.5)))
                .ok_or_else(|| anyhow!("oracle down"))
        }
    }

    struct Trades(Option<Vec<TradeRecord>>);

    #[async_trait]
    impl TradeHistorySource for Trades {
        async fn fetch_trade_history(&self) -> Result<Vec<TradeRecord>> {
            self.0.clone().ok_or_else(|| anyhow!("history down"))
        }
    }

    fn service(oracle: Arc<Oracle>, trades: Option<Vec<TradeRecord>>) -> PriceService {
        let mut settings = Settings::default();
        settings.sources.max_pair_slots = 5;
        settings.sources.request_timeout_ms = 500;

        let sources = Sources {
            pairs: Arc::new(StaticPairs),
            oracle,
            trades: Some(Arc::new(Trades(trades))),
        };
        PriceService::new(sources, Arc::new(MokaPriceCache::new(4)), &settings)
    }

    fn oracle(price: Option<f64>) -> Arc<Oracle> {
        Arc::new(Oracle {
            price,
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_prices_with_failed_pair_slot() {
        let service = service(oracle(Some(2.0)), Some(Vec::new()));
        let table = service.get_prices(false).await;

        assert_eq!(table.diagnostics.pair_count, 2);
        assert_eq!(table.get("X").unwrap().price_usd, 4.0);
        assert_eq!(table.get("Y").unwrap().price_usd, 8.0);
        assert_eq!(
            table.get("Y").unwrap().derived_from,
            DerivedFrom::Token("X".into())
        );
        assert_eq!(table.anchor_change_24h, Some(1.5));
    }

    #[tokio::test]
    async fn test_cached_until_forced() {
        let oracle = oracle(Some(2.0));
        let service = service(oracle.clone(), Some(Vec::new()));

        service.get_prices(false).await;
        service.get_prices(false).await;
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);

        service.refresh().await;
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_oracle_down_degrades_to_zero() {
        let service = service(oracle(None), Some(Vec::new()));
        let table = service.get_prices(true).await;

        assert_eq!(table.anchor_price_usd, 0.0);
        let y = table.get("Y").unwrap();
        assert_eq!(y.price_usd, 0.0);
        assert_eq!(y.depth, 2);
    }

    #[tokio::test]
    async fn test_trade_history_down_leaves_changes_empty() {
        let service = service(oracle(Some(2.0)), None);
        let table = service.get_prices(true).await;
        assert!(table.get("X").unwrap().price_change_24h.is_none());
    }

    #[tokio::test]
    async fn test_trade_history_feeds_changes() {
        let now = Utc::now().timestamp();
        let trade = |timestamp: i64, klv_in: f64| TradeRecord {
            timestamp,
            status: TradeStatus::Success,
            input_token: "KLV".to_string(),
            output_token: "X-AB12".to_string(),
            input_amount: klv_in,
            output_amount: 1.0,
        };
        let service = service(
            oracle(Some(2.0)),
            Some(vec![trade(now - 600, 2.0), trade(now - 60, 3.0)]),
        );
        let table = service.get_prices(true).await;
        assert_eq!(table.get("X").unwrap().price_change_24h, Some(50.0));
    }
}
