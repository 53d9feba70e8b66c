//! Reference pool statistics and the pool directory
//!
//! Two API shapes are supported. Forknote pools serve everything from
//! `<api>stats`; Node-JS pools split pool and network statistics across
//! `<api>pool/stats` and `<api>network/stats`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

use super::json::{build_client, fetch_json, lenient_f64};
use crate::consensus::{PoolApiKind, PoolDirectory, PoolSample, ReferencePoolSource, TimeEstimate};
use crate::constants::upstream::{
    FORKNOTE_STATS_PATH, NODEJS_NETWORK_STATS_PATH, NODEJS_POOL_STATS_PATH,
};
use crate::errors::UpstreamError;

/// Directory as served; entries are decoded one by one
#[derive(Debug, Deserialize)]
struct RawPoolDirectory {
    pools: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ForknoteStats {
    pool: ForknotePool,
    network: NetworkStats,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForknotePool {
    #[serde(default, deserialize_with = "lenient_f64")]
    hashrate: f64,
    /// Milliseconds since the epoch, zero when the pool never found a block
    #[serde(default, deserialize_with = "lenient_f64")]
    last_block_found: f64,
}

#[derive(Debug, Deserialize)]
struct NetworkStats {
    height: u64,
    #[serde(default, deserialize_with = "lenient_f64")]
    difficulty: f64,
}

#[derive(Debug, Deserialize)]
struct NodeJsPoolStats {
    pool_statistics: NodeJsPoolStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeJsPoolStatistics {
    #[serde(default, deserialize_with = "lenient_f64")]
    hash_rate: f64,
    /// Seconds since the epoch
    #[serde(default, deserialize_with = "lenient_f64")]
    last_block_found: f64,
}

#[derive(Clone)]
pub struct PoolStatsClient {
    client: Client,
    request_timeout: Duration,
}

impl PoolStatsClient {
    pub fn new(request_timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(request_timeout, true)?,
            request_timeout,
        })
    }

    /// Fetch the externally hosted pool directory
    pub async fn fetch_directory(&self, url: &str) -> Result<PoolDirectory, UpstreamError> {
        let raw: RawPoolDirectory = fetch_json(&self.client, url, self.request_timeout).await?;
        Ok(directory_from_entries(url, raw.pools))
    }

    /// Fetch network height and pool statistics for one supported pool
    pub async fn fetch_pool(
        &self,
        kind: PoolApiKind,
        source: &ReferencePoolSource,
        now: DateTime<Utc>,
    ) -> Result<PoolSample, UpstreamError> {
        match kind {
            PoolApiKind::Forknote => self.fetch_forknote(source, now).await,
            PoolApiKind::NodeJs => self.fetch_nodejs(source, now).await,
        }
    }

    async fn fetch_forknote(
        &self,
        source: &ReferencePoolSource,
        now: DateTime<Utc>,
    ) -> Result<PoolSample, UpstreamError> {
        let url = format!("{}{}", source.api, FORKNOTE_STATS_PATH);
        let stats: ForknoteStats = fetch_json(&self.client, &url, self.request_timeout).await?;

        let last_found = if stats.pool.last_block_found == 0.0 {
            TimeEstimate::Never
        } else {
            seconds_since(stats.pool.last_block_found / 1000.0, now)
        };

        Ok(PoolSample {
            height: stats.network.height,
            estimated_solve_time: TimeEstimate::ratio(stats.network.difficulty, stats.pool.hashrate),
            last_found,
        })
    }

    async fn fetch_nodejs(
        &self,
        source: &ReferencePoolSource,
        now: DateTime<Utc>,
    ) -> Result<PoolSample, UpstreamError> {
        let pool_url = format!("{}{}", source.api, NODEJS_POOL_STATS_PATH);
        let network_url = format!("{}{}", source.api, NODEJS_NETWORK_STATS_PATH);

        let (pool, network) = tokio::try_join!(
            fetch_json::<NodeJsPoolStats>(&self.client, &pool_url, self.request_timeout),
            fetch_json::<NetworkStats>(&self.client, &network_url, self.request_timeout),
        )?;

        let last_found = if pool.pool_statistics.last_block_found == 0.0 {
            TimeEstimate::Never
        } else {
            seconds_since(pool.pool_statistics.last_block_found, now)
        };

        Ok(PoolSample {
            height: network.height,
            estimated_solve_time: TimeEstimate::ratio(
                network.difficulty,
                pool.pool_statistics.hash_rate,
            ),
            last_found,
        })
    }
}

/// Decode directory entries, skipping any that are malformed
fn directory_from_entries(url: &str, entries: Vec<Value>) -> PoolDirectory {
    let pools = entries
        .into_iter()
        .enumerate()
        .filter_map(
            |(index, entry)| match serde_json::from_value::<ReferencePoolSource>(entry) {
                Ok(source) => Some(source),
                Err(e) => {
                    warn!("Skipping pool directory entry {} from {}: {}", index, url, e);
                    None
                }
            },
        )
        .collect();

    PoolDirectory { pools }
}

/// Seconds between an epoch timestamp (in seconds) and `now`, never negative
fn seconds_since(epoch_seconds: f64, now: DateTime<Utc>) -> TimeEstimate {
    let now_seconds = now.timestamp_millis() as f64 / 1000.0;
    TimeEstimate::Seconds((now_seconds - epoch_seconds).max(0.0))
}
