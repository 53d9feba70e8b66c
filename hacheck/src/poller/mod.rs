//! Poll orchestration
//!
//! Three refresh operations keep the store current: service node heights,
//! the reference pool directory and reference pool heights. Each one fans
//! out a call per target, isolates failures, merges history from the
//! previous cycle and swaps the result into the store.

pub mod merge;

use anyhow::Result;
use futures::future::join_all;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::config::Config;
use crate::consensus::{
    ConsensusResult, ConsensusStateStore, FreshObservation, GroupKind, PoolApiKind, PoolDetails,
    ReferencePoolSource,
};
use crate::errors::{HaCheckError, UpstreamError};
use crate::upstream::{NodeHeightClient, PoolStatsClient};

pub use merge::{merge_observations, stamp_pool_status};

/// Outcome of one refresh, for logging and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshSummary {
    pub total: usize,
    pub failed: usize,
    pub unsupported: usize,
    pub consensus: ConsensusResult,
}

#[derive(Clone)]
pub struct HeightPoller {
    config: Arc<Config>,
    store: Arc<ConsensusStateStore>,
    node_client: NodeHeightClient,
    pool_client: PoolStatsClient,
    clock: Arc<dyn Clock>,
    // One in-flight cap per refresh family
    node_limiter: Arc<Semaphore>,
    pool_limiter: Arc<Semaphore>,
}

impl HeightPoller {
    pub fn new(
        config: Arc<Config>,
        store: Arc<ConsensusStateStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let node_client = NodeHeightClient::new(config.service_node_timeout())?;
        let pool_client = PoolStatsClient::new(config.network_pool_timeout())?;
        let node_limiter = Arc::new(Semaphore::new(config.concurrency_limit()));
        let pool_limiter = Arc::new(Semaphore::new(config.concurrency_limit()));

        Ok(Self {
            config,
            store,
            node_client,
            pool_client,
            clock,
            node_limiter,
            pool_limiter,
        })
    }

    /// Poll every enabled service node once
    pub async fn refresh_service_nodes(&self) -> RefreshSummary {
        let targets = self.config.monitored_targets();
        let mut tasks = Vec::with_capacity(targets.len());

        for target in &targets {
            let target = target.clone();
            let client = self.node_client.clone();
            let limiter = self.node_limiter.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = limiter.acquire_owned().await.ok();
                match client.fetch_height(&target).await {
                    Ok(height) => FreshObservation::succeeded(target.name, height),
                    Err(e) => {
                        warn!(
                            "Failed to get height from {} {}:{}, reason: {}",
                            target.name, target.host, target.port, e
                        );
                        FreshObservation::failed(target.name)
                    }
                }
            }));
        }

        let results = join_all(tasks).await;
        let fresh: Vec<FreshObservation> = targets
            .iter()
            .zip(results)
            .map(|(target, result)| match result {
                Ok(observation) => observation,
                Err(e) => {
                    error!("Height check task for {} panicked: {}", target.name, e);
                    FreshObservation::failed(target.name.clone())
                }
            })
            .collect();

        let failed = fresh.iter().filter(|obs| obs.failed).count();
        let previous = self.store.snapshot(GroupKind::ServiceNodes);
        let group = merge_observations(&previous, fresh, self.config.mode_fuzzing, self.clock.now());

        let summary = RefreshSummary {
            total: targets.len(),
            failed,
            unsupported: 0,
            consensus: group.consensus,
        };
        self.store.replace(GroupKind::ServiceNodes, group);

        info!(
            "Updated service nodes. Success: {}, Fail: {}, Mode: {}, Mode valid: {}, Mode invalid: {}",
            summary.total - summary.failed,
            summary.failed,
            summary.consensus.mode_height,
            summary.consensus.valid_count,
            summary.consensus.invalid_count
        );

        summary
    }

    /// Fetch the pool directory; the previous list stays on any failure
    pub async fn refresh_reference_pool_list(&self) -> Result<usize, HaCheckError> {
        let url = &self.config.pool_list_url;

        let directory = match self.pool_client.fetch_directory(url).await {
            Ok(directory) => directory,
            Err(e) => {
                error!("Failed to update network pool list: {}", e);
                return Err(e.into());
            }
        };

        let supported = directory
            .pools
            .iter()
            .filter(|pool| pool.api_kind().is_some())
            .count();

        if supported == 0 {
            error!(
                "Network pool list from {} has no supported pools ({} listed), keeping previous list",
                url,
                directory.pools.len()
            );
            return Err(UpstreamError::Parse {
                url: url.clone(),
                reason: "no supported pools listed".to_string(),
            }
            .into());
        }

        let count = directory.pools.len();
        self.store.replace_pool_sources(directory.pools);
        info!(
            "Updated network pool list. Count: {}, Supported: {}",
            count, supported
        );

        Ok(count)
    }

    /// Poll every supported pool from the current directory once
    pub async fn refresh_reference_pools(&self) -> RefreshSummary {
        let sources = self.store.pool_sources();
        let targets = supported_targets(&sources);
        let unsupported = sources
            .iter()
            .filter(|source| source.api_kind().is_none())
            .count();
        let started = self.clock.now();

        let mut tasks = Vec::with_capacity(targets.len());
        for (kind, source) in &targets {
            let kind = *kind;
            let source = source.clone();
            let client = self.pool_client.clone();
            let limiter = self.pool_limiter.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = limiter.acquire_owned().await.ok();
                match client.fetch_pool(kind, &source, started).await {
                    Ok(sample) => Some(FreshObservation {
                        key: source.name.clone(),
                        height: sample.height,
                        failed: false,
                        pool: Some(PoolDetails {
                            name: source.name,
                            url: source.url,
                            api: source.api,
                            kind,
                            mining_address: source.mining_address,
                            estimated_solve_time: sample.estimated_solve_time,
                            last_found: sample.last_found,
                            status: None,
                        }),
                    }),
                    Err(e) => {
                        warn!("Failed to get pool info for {} ({}): {}", source.name, source.api, e);
                        None
                    }
                }
            }));
        }

        let results = join_all(tasks).await;
        let fresh: Vec<FreshObservation> = results
            .into_iter()
            .filter_map(|result| match result {
                Ok(observation) => observation,
                Err(e) => {
                    error!("Pool check task panicked: {}", e);
                    None
                }
            })
            .collect();

        let failed = targets.len() - fresh.len();
        let previous = self.store.snapshot(GroupKind::ReferencePools);
        let mut group =
            merge_observations(&previous, fresh, self.config.mode_fuzzing, self.clock.now());
        stamp_pool_status(&mut group, self.config.service_node_max_alert_deviance);

        let summary = RefreshSummary {
            total: targets.len(),
            failed,
            unsupported,
            consensus: group.consensus,
        };
        self.store.replace(GroupKind::ReferencePools, group);

        info!(
            "Updated network pools. Success: {}, Fail: {}, Total: {}, Unsupported: {}, Mode: {}, Mode valid: {}, Mode invalid: {}, Consensus: {}%",
            summary.total - summary.failed,
            summary.failed,
            sources.len(),
            summary.unsupported,
            summary.consensus.mode_height,
            summary.consensus.valid_count,
            summary.consensus.invalid_count,
            summary.consensus.consensus_percent
        );

        summary
    }

    /// One pass of the startup sequence; only the pool directory can fail it
    pub async fn try_bootstrap(&self) -> Result<(), HaCheckError> {
        self.refresh_service_nodes().await;
        self.refresh_reference_pool_list()
            .await
            .map_err(|e| HaCheckError::Bootstrap {
                reason: e.to_string(),
            })?;
        self.refresh_reference_pools().await;
        Ok(())
    }

    /// Run the startup sequence until it succeeds
    pub async fn bootstrap(&self) {
        let retry_delay = self.config.bootstrap_retry_delay();
        let mut attempt = 0u32;

        loop {
            attempt += 1;
            info!("Initializing (attempt {})...", attempt);

            match self.try_bootstrap().await {
                Ok(()) => {
                    info!("Initialization complete");
                    return;
                }
                Err(e) => {
                    error!(
                        "Initialization error: {}. Retrying in {}s",
                        e,
                        retry_delay.as_secs()
                    );
                    sleep(retry_delay).await;
                }
            }
        }
    }

    /// Start the three refresh loops; each first fires one period from now
    pub fn spawn_background_tasks(&self) -> Vec<JoinHandle<()>> {
        vec![
            self.spawn_refresh_loop(
                "service nodes",
                self.config.service_node_refresh_seconds,
                |poller| async move {
                    poller.refresh_service_nodes().await;
                },
            ),
            self.spawn_refresh_loop(
                "network pool list",
                self.config.network_pool_list_refresh_seconds,
                |poller| async move {
                    if poller.refresh_reference_pool_list().await.is_err() {
                        warn!("Keeping previous network pool list");
                    }
                },
            ),
            self.spawn_refresh_loop(
                "network pools",
                self.config.network_pool_refresh_seconds,
                |poller| async move {
                    poller.refresh_reference_pools().await;
                },
            ),
        ]
    }

    fn spawn_refresh_loop<F, Fut>(
        &self,
        label: &'static str,
        period_seconds: u64,
        refresh: F,
    ) -> JoinHandle<()>
    where
        F: Fn(HeightPoller) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let poller = self.clone();
        let period = Duration::from_secs(period_seconds);

        info!("Refreshing {} every {}s", label, period_seconds);

        tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                run_guarded(label, refresh(poller.clone())).await;
            }
        })
    }
}

/// Run one refresh in its own task so a panic is logged and the loop goes on
async fn run_guarded<Fut>(label: &'static str, refresh: Fut) -> bool
where
    Fut: Future<Output = ()> + Send + 'static,
{
    match tokio::spawn(refresh).await {
        Ok(()) => true,
        Err(e) => {
            error!("Refresh of {} failed: {}; retrying next period", label, e);
            false
        }
    }
}

/// Supported pools in directory order, first entry per name
fn supported_targets(sources: &[ReferencePoolSource]) -> Vec<(PoolApiKind, ReferencePoolSource)> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .filter_map(|source| source.api_kind().map(|kind| (kind, source)))
        .filter(|(_, source)| seen.insert(source.name.clone()))
        .map(|(kind, source)| (kind, source.clone()))
        .collect()
}
