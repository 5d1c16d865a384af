use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::{future::Cache, Expiry};

use crate::config::CacheSettings;
use crate::models::PriceTable;

/// Key-value store for computed price tables.
#[async_trait]
pub trait PriceCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Arc<PriceTable>>;
    async fn set(&self, key: &str, value: Arc<PriceTable>, ttl: Duration);
}

#[derive(Clone)]
struct CachedTable {
    table: Arc<PriceTable>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was written with.
struct PerEntryTtl;

impl Expiry<String, CachedTable> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedTable,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedTable,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process [`PriceCache`] backed by moka.
#[derive(Clone)]
pub struct MokaPriceCache {
    inner: Cache<String, CachedTable>,
}

impl MokaPriceCache {
    pub fn new(max_capacity: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { inner }
    }

    pub fn from_settings(settings: &CacheSettings) -> Self {
        Self::new(settings.max_capacity)
    }
}

#[async_trait]
impl PriceCache for MokaPriceCache {
    async fn get(&self, key: &str) -> Option<Arc<PriceTable>> {
        self.inner.get(key).await.map(|cached| cached.table)
    }

    async fn set(&self, key: &str, value: Arc<PriceTable>, ttl: Duration) {
        self.inner
            .insert(key.to_string(), CachedTable { table: value, ttl })
            .await;
    }
}
