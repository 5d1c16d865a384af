//! Job to recompute the price table and re-populate the output cache.
//!
//! Consumers reading through `PriceService::get_prices(false)` keep hitting
//! a warm cache while this job runs ahead of the TTL.

use anyhow::Result;
use log::{info, warn};

use crate::service::PriceService;

pub async fn run(service: &PriceService) -> Result<()> {
    info!("Starting refresh_prices job...");

    let start = std::time::Instant::now();
    let table = service.refresh().await;

    if table.diagnostics.pair_count == 0 {
        warn!("No pairs fetched, table holds only the anchor");
    }

    info!(
        "Completed refresh_prices job in {:?} ({} tokens, {} unpriced)",
        start.elapsed(),
        table.len(),
        table.diagnostics.unpriced.len()
    );
    Ok(())
}
