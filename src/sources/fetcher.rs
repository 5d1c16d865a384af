use std::time::Duration;

use log::{debug, info};

use super::PairSource;
use crate::models::RawPair;

/// Fetch pair slots `1..=max_slots` concurrently.
///
/// Every slot is an independent request bounded by `timeout`. A slot that
/// errors, times out or is empty is treated as "pair does not exist".
/// Resolves only once every request has finished. Output is ordered by
/// pair id.
pub async fn fetch_all_pairs(
    source: &dyn PairSource,
    max_slots: u64,
    timeout: Duration,
) -> Vec<RawPair> {
    let tasks = (1..=max_slots.max(1)).map(|pair_id| async move {
        match tokio::time::timeout(timeout, source.fetch_pair(pair_id)).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                debug!("Pair {} fetch failed: {:#}", pair_id, e);
                None
            },
            Err(_) => {
                debug!("Pair {} fetch timed out", pair_id);
                None
            },
        }
    });

    let pairs: Vec<RawPair> = futures::future::join_all(tasks)
        .await
        .into_iter()
        .flatten()
        .collect();

    info!("Fetched {} pairs from {} slots", pairs.len(), max_slots);
    pairs
}
