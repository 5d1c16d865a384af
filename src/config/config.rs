use std::collections::BTreeMap;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::cron::CronSettings;
use crate::engine::DEFAULT_ITERATION_CEILING;

/// Price engine configuration.
///
/// Controls the anchor set and the propagation budget.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineSettings {
    /// Symbol of the native chain token priced by the oracle
    #[serde(default = "default_native_symbol")]
    pub native_symbol: String,
    /// Maximum relaxation passes per propagation phase
    #[serde(default = "default_iteration_ceiling")]
    pub iteration_ceiling: usize,
    /// Stablecoin symbol -> pegged USD price
    #[serde(default = "default_stablecoins")]
    pub stablecoins: BTreeMap<String, f64>,
}

fn default_native_symbol() -> String {
    "KLV".to_string()
}

fn default_iteration_ceiling() -> usize {
    DEFAULT_ITERATION_CEILING
}

fn default_stablecoins() -> BTreeMap<String, f64> {
    BTreeMap::from([("USDT".to_string(), 1.0)])
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            native_symbol: default_native_symbol(),
            iteration_ceiling: default_iteration_ceiling(),
            stablecoins: default_stablecoins(),
        }
    }
}

/// External data source configuration.
///
/// - Pair reserves: DEX contract view queried through the node API
/// - Anchor price: market-data oracle
/// - Trade history: swap history endpoint (optional)
#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    #[serde(default = "default_node_url")]
    pub node_url: String,
    /// DEX contract address holding the pairs
    #[serde(default)]
    pub dex_contract: String,
    /// Pair ids `1..=max_pair_slots` are queried on every refresh
    #[serde(default = "default_max_pair_slots")]
    pub max_pair_slots: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_oracle_url")]
    pub oracle_url: String,
    #[serde(default = "default_oracle_coin_id")]
    pub oracle_coin_id: String,
    /// Swap history endpoint; price changes are empty when unset
    #[serde(default)]
    pub trade_history_url: Option<String>,
    /// Symbol -> decimal precision for reserve scaling
    #[serde(default)]
    pub token_decimals: BTreeMap<String, u8>,
    #[serde(default = "default_decimals")]
    pub default_decimals: u8,
}

fn default_node_url() -> String {
    "https://node.mainnet.klever.org".to_string()
}

fn default_max_pair_slots() -> u64 {
    50
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_oracle_url() -> String {
    "https://api.coingecko.com/api/v3".to_string()
}

fn default_oracle_coin_id() -> String {
    "klever".to_string()
}

fn default_decimals() -> u8 {
    6
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            node_url: default_node_url(),
            dex_contract: String::new(),
            max_pair_slots: default_max_pair_slots(),
            request_timeout_ms: default_request_timeout_ms(),
            oracle_url: default_oracle_url(),
            oracle_coin_id: default_oracle_coin_id(),
            trade_history_url: None,
            token_decimals: BTreeMap::new(),
            default_decimals: default_decimals(),
        }
    }
}

impl SourceSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

/// Output cache configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheSettings {
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_max_capacity")]
    pub max_capacity: u64,
}

fn default_cache_ttl_secs() -> u64 {
    60
}

fn default_cache_max_capacity() -> u64 {
    64
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_capacity: default_cache_max_capacity(),
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Root application configuration.
///
/// Loaded from an optional `config.{yaml,toml,json}` file, overlaid with
/// `PRICEMESH__SECTION__KEY` environment variables.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub engine: EngineSettings,
    #[serde(default)]
    pub sources: SourceSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub cron: CronSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("PRICEMESH").separator("__"))
            .build()?;

        let settings: Settings = s.try_deserialize()?;

        Ok(settings)
    }
}
