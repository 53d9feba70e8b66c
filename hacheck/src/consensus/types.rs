//! Observation, consensus and pool source types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

use crate::constants::upstream::{FORKNOTE_KIND, NODEJS_KIND};
use crate::status::HealthState;

/// A configured daemon whose health this service reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoredTarget {
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl MonitoredTarget {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Entry of the external pool directory JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePoolSource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub mining_address: String,
}

impl ReferencePoolSource {
    /// The client shape for this pool, or `None` for entries that must never be polled
    pub fn api_kind(&self) -> Option<PoolApiKind> {
        if self.name.trim().is_empty() || self.api.trim().is_empty() {
            return None;
        }
        match self.kind.as_str() {
            FORKNOTE_KIND => Some(PoolApiKind::Forknote),
            NODEJS_KIND => Some(PoolApiKind::NodeJs),
            _ => None,
        }
    }
}

/// Top level of the pool directory JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolDirectory {
    pub pools: Vec<ReferencePoolSource>,
}

/// Supported reference pool API shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PoolApiKind {
    #[serde(rename = "forknote")]
    Forknote,
    #[serde(rename = "node.js")]
    NodeJs,
}

/// A duration in seconds that may be unknowable, rendered as "Never"
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeEstimate {
    Seconds(f64),
    Never,
}

impl TimeEstimate {
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 || !numerator.is_finite() || !denominator.is_finite() {
            TimeEstimate::Never
        } else {
            TimeEstimate::Seconds(numerator / denominator)
        }
    }
}

impl Serialize for TimeEstimate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeEstimate::Seconds(value) => serializer.serialize_f64(*value),
            TimeEstimate::Never => serializer.serialize_str("Never"),
        }
    }
}

/// Values a pool client reports for one pool
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSample {
    pub height: u64,
    pub estimated_solve_time: TimeEstimate,
    pub last_found: TimeEstimate,
}

/// Reference pool metadata carried alongside its height
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDetails {
    pub name: String,
    pub url: String,
    pub api: String,
    #[serde(rename = "type")]
    pub kind: PoolApiKind,
    pub mining_address: String,
    pub estimated_solve_time: TimeEstimate,
    pub last_found: TimeEstimate,
    pub status: Option<HealthState>,
}

/// What one poll of one key produced, before history is merged in
#[derive(Debug, Clone)]
pub struct FreshObservation {
    pub key: String,
    pub height: u64,
    pub failed: bool,
    pub pool: Option<PoolDetails>,
}

impl FreshObservation {
    pub fn succeeded(key: impl Into<String>, height: u64) -> Self {
        Self {
            key: key.into(),
            height,
            failed: false,
            pool: None,
        }
    }

    pub fn failed(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            height: 0,
            failed: true,
            pool: None,
        }
    }
}

/// Height of one key as of the latest cycle
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeightObservation {
    pub key: String,
    pub height: u64,
    pub observed_at: DateTime<Utc>,
    pub last_changed_at: DateTime<Utc>,
    pub failed: bool,
    pub mode_height: u64,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolDetails>,
}

impl HeightObservation {
    pub fn mining_address(&self) -> Option<&str> {
        self.pool.as_ref().map(|pool| pool.mining_address.as_str())
    }
}

/// Fuzzy mode over one group's heights
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusResult {
    pub mode_height: u64,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub consensus_percent: f64,
}

/// The two observation groups kept in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    ServiceNodes,
    ReferencePools,
}

/// One complete refresh result, swapped into the store as a unit
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationGroup {
    pub observations: Vec<HeightObservation>,
    pub consensus: ConsensusResult,
    pub refreshed_at: Option<DateTime<Utc>>,
    /// Last known height of keys missing from this cycle
    #[serde(skip)]
    pub history: HashMap<String, HeightMark>,
}

/// Height a key last reported and when that height was first seen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightMark {
    pub height: u64,
    pub last_changed_at: DateTime<Utc>,
}

impl ObservationGroup {
    pub fn find(&self, key: &str) -> Option<&HeightObservation> {
        self.observations.iter().find(|obs| obs.key == key)
    }

    pub fn find_by_mining_address(&self, mining_address: &str) -> Option<&HeightObservation> {
        self.observations
            .iter()
            .find(|obs| obs.mining_address() == Some(mining_address))
    }

    pub fn heights(&self) -> Vec<u64> {
        self.observations.iter().map(|obs| obs.height).collect()
    }
}
