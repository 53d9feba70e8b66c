//! UP/DOWN decision policy

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl HealthState {
    pub fn from_bool(up: bool) -> Self {
        if up {
            HealthState::Up
        } else {
            HealthState::Down
        }
    }

    pub fn is_up(self) -> bool {
        self == HealthState::Up
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Up => "UP",
            HealthState::Down => "DOWN",
        }
    }
}

/// Configured limits the policy works against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionThresholds {
    pub max_failover_deviance: u64,
    pub max_alert_deviance: u64,
    pub min_consensus_percent: f64,
    pub min_non_consensus_seconds: u64,
}

impl DecisionThresholds {
    /// A caller-supplied override always wins over the configured defaults
    pub fn effective_deviance(&self, override_deviance: Option<u64>, failover_check: bool) -> u64 {
        match override_deviance {
            Some(deviance) => deviance,
            None if failover_check => self.max_failover_deviance,
            None => self.max_alert_deviance,
        }
    }
}

/// Everything the policy looks at for one node
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput {
    pub consensus_percent: f64,
    pub mode_height: u64,
    pub observed_height: u64,
    pub last_changed_at: DateTime<Utc>,
    pub now: DateTime<Utc>,
    pub effective_deviance: u64,
}

impl DecisionInput {
    pub fn deviance(&self) -> u64 {
        self.mode_height.abs_diff(self.observed_height)
    }
}

/// Decide whether a node is in consensus.
///
/// With a trustworthy mode the node is UP when within the deviance limit.
/// Without one, a node that reports nothing or has not moved for longer
/// than the non-consensus window is DOWN; any other node is UP.
pub fn decide(input: &DecisionInput, thresholds: &DecisionThresholds) -> HealthState {
    if input.consensus_percent >= thresholds.min_consensus_percent {
        return HealthState::from_bool(input.deviance() <= input.effective_deviance);
    }

    let frozen_for = input.now - input.last_changed_at;
    let frozen_limit = Duration::seconds(thresholds.min_non_consensus_seconds as i64);

    if input.observed_height == 0 || frozen_for > frozen_limit {
        HealthState::Down
    } else {
        HealthState::Up
    }
}
