use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::policy::{decide, DecisionInput, HealthState};
use crate::clock::Clock;
use crate::config::Config;
use crate::consensus::{ConsensusStateStore, GroupKind, ObservationGroup};
use crate::errors::HaCheckError;

/// One health check question, already parsed from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRequest {
    pub key: String,
    pub mining_address: bool,
    pub deviance_override: Option<u64>,
    pub failover_check: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub key: String,
    pub status: HealthState,
    pub mode_height: u64,
    pub mode_valid: usize,
    pub mode_invalid: usize,
    pub mode_consensus_percent: f64,
    pub observed_height: u64,
    pub deviance: u64,
    pub effective_deviance: u64,
    pub last_change_age_seconds: i64,
    pub updated_age_seconds: i64,
}

/// Answers health checks from the current store contents.
///
/// The reference pool group is the network's voting set: its consensus is
/// the yardstick for service nodes and for individual pools alike.
pub struct StatusEvaluator {
    config: Arc<Config>,
    store: Arc<ConsensusStateStore>,
    clock: Arc<dyn Clock>,
}

impl StatusEvaluator {
    pub fn new(config: Arc<Config>, store: Arc<ConsensusStateStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            store,
            clock,
        }
    }

    pub fn snapshot(&self, kind: GroupKind) -> Arc<ObservationGroup> {
        self.store.snapshot(kind)
    }

    pub fn evaluate(&self, request: &StatusRequest) -> Result<StatusReport, HaCheckError> {
        let unknown = || HaCheckError::UnknownTarget {
            key: request.key.clone(),
            mining_address: request.mining_address,
        };

        let reference_pools = self.store.snapshot(GroupKind::ReferencePools);

        let service_nodes;
        let observation = if request.mining_address {
            reference_pools
                .find_by_mining_address(&request.key)
                .ok_or_else(unknown)?
        } else {
            if !self.config.is_monitored(&request.key) {
                return Err(unknown());
            }
            service_nodes = self.store.snapshot(GroupKind::ServiceNodes);
            service_nodes.find(&request.key).ok_or_else(unknown)?
        };

        let consensus = reference_pools.consensus;
        let thresholds = self.config.thresholds();
        let now = self.clock.now();

        let input = DecisionInput {
            consensus_percent: consensus.consensus_percent,
            mode_height: consensus.mode_height,
            observed_height: observation.height,
            last_changed_at: observation.last_changed_at,
            now,
            effective_deviance: thresholds
                .effective_deviance(request.deviance_override, request.failover_check),
        };
        let status = decide(&input, &thresholds);

        let report = StatusReport {
            key: request.key.clone(),
            status,
            mode_height: consensus.mode_height,
            mode_valid: consensus.valid_count,
            mode_invalid: consensus.invalid_count,
            mode_consensus_percent: consensus.consensus_percent,
            observed_height: observation.height,
            deviance: input.deviance(),
            effective_deviance: input.effective_deviance,
            last_change_age_seconds: (now - observation.last_changed_at).num_seconds().max(0),
            updated_age_seconds: (now - observation.observed_at).num_seconds().max(0),
        };

        info!(
            "Request for {}: mode height {}, mode valid {}, mode invalid {}, consensus {}%, height {}, deviance {}, status {}",
            report.key,
            report.mode_height,
            report.mode_valid,
            report.mode_invalid,
            report.mode_consensus_percent,
            report.observed_height,
            report.deviance,
            report.status.as_str()
        );

        Ok(report)
    }
}
