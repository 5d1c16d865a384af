//! Cron scheduler for periodic background tasks.
//!
//! Runs jobs like:
//! - Refreshing the cached price table

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use log::{error, info};
use serde::Deserialize;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;

use crate::service::PriceService;

use super::jobs;

/// Cron scheduler that manages periodic background jobs.
pub struct CronScheduler {
    service: Arc<PriceService>,
    settings: Arc<CronSettings>,
}

/// Configuration for cron job intervals
#[derive(Debug, Clone, Deserialize)]
pub struct CronSettings {
    /// Interval for refreshing the price table - default 30 seconds
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval_secs() -> u64 {
    30
}

impl Default for CronSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

impl CronScheduler {
    pub fn new(service: Arc<PriceService>, settings: CronSettings) -> Self {
        Self {
            service,
            settings: Arc::new(settings),
        }
    }

    /// Starts the cron scheduler and runs until cancellation.
    pub async fn run(&self, cancellation_token: CancellationToken) -> Result<()> {
        let mut scheduler = JobScheduler::new().await?;

        self.register_refresh_prices_job(&scheduler).await?;

        scheduler.start().await?;
        info!("Cron scheduler started with {} jobs", 1);

        // Wait for cancellation
        cancellation_token.cancelled().await;
        info!("Cron scheduler shutting down...");

        scheduler.shutdown().await?;
        Ok(())
    }

    async fn register_refresh_prices_job(&self, scheduler: &JobScheduler) -> Result<()> {
        let service = self.service.clone();
        let interval = self.settings.refresh_interval_secs.max(1);

        let job = Job::new_repeated_async(Duration::from_secs(interval), move |_uuid, _lock| {
            let service = service.clone();
            Box::pin(async move {
                if let Err(e) = jobs::refresh_prices::run(&service).await {
                    error!("Failed to refresh prices: {:#}", e);
                }
            })
        })?;

        scheduler.add(job).await?;
        info!("Registered refresh_prices job (every {}s)", interval);
        Ok(())
    }
}
