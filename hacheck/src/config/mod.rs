pub mod manager;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::constants::defaults;
use crate::consensus::MonitoredTarget;
use crate::status::DecisionThresholds;

pub use manager::ConfigManager;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub pool_list_url: String,
    #[serde(default = "default_service_node_timeout")]
    pub service_node_timeout_seconds: u64,
    #[serde(default = "default_service_node_refresh")]
    pub service_node_refresh_seconds: u64,
    #[serde(default = "default_network_pool_timeout")]
    pub network_pool_timeout_seconds: u64,
    #[serde(default = "default_network_pool_refresh")]
    pub network_pool_refresh_seconds: u64,
    #[serde(default = "default_network_pool_list_refresh")]
    pub network_pool_list_refresh_seconds: u64,
    #[serde(default = "default_max_failover_deviance")]
    pub service_node_max_failover_deviance: u64,
    #[serde(default = "default_max_alert_deviance")]
    pub service_node_max_alert_deviance: u64,
    #[serde(default = "default_min_consensus_percent")]
    pub min_actionable_mode_consensus_percent: f64,
    #[serde(default = "default_min_non_consensus_seconds")]
    pub min_actionable_non_consensus_seconds: u64,
    #[serde(default = "default_mode_fuzzing")]
    pub mode_fuzzing: u64,
    pub max_concurrent_requests: Option<usize>,
    pub bootstrap_retry_seconds: Option<u64>,
    // Populated from the node group files
    #[serde(skip)]
    pub service_nodes: BTreeMap<String, ServiceNodeConfig>,
}

/// One `<group>.toml` file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfigFile {
    #[serde(default)]
    pub nodes: HashMap<String, ServiceNodeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceNodeConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(skip)]
    pub group: String,
}

fn default_host() -> String {
    defaults::HOST.to_string()
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_service_node_timeout() -> u64 {
    defaults::SERVICE_NODE_TIMEOUT_SECONDS
}

fn default_service_node_refresh() -> u64 {
    defaults::SERVICE_NODE_REFRESH_SECONDS
}

fn default_network_pool_timeout() -> u64 {
    defaults::NETWORK_POOL_TIMEOUT_SECONDS
}

fn default_network_pool_refresh() -> u64 {
    defaults::NETWORK_POOL_REFRESH_SECONDS
}

fn default_network_pool_list_refresh() -> u64 {
    defaults::NETWORK_POOL_LIST_REFRESH_SECONDS
}

fn default_max_failover_deviance() -> u64 {
    defaults::MAX_FAILOVER_DEVIANCE
}

fn default_max_alert_deviance() -> u64 {
    defaults::MAX_ALERT_DEVIANCE
}

fn default_min_consensus_percent() -> f64 {
    defaults::MIN_ACTIONABLE_MODE_CONSENSUS_PERCENT
}

fn default_min_non_consensus_seconds() -> u64 {
    defaults::MIN_ACTIONABLE_NON_CONSENSUS_SECONDS
}

fn default_mode_fuzzing() -> u64 {
    defaults::MODE_FUZZING
}

fn default_enabled() -> bool {
    true
}

impl Config {
    /// Build a config from `main.toml` content alone, without node groups
    pub fn from_main_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| anyhow!("Failed to parse main config: {}", e))
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_list_url.trim().is_empty() {
            return Err(anyhow!("pool_list_url must not be empty"));
        }

        let rates = [
            ("service_node_timeout_seconds", self.service_node_timeout_seconds),
            ("service_node_refresh_seconds", self.service_node_refresh_seconds),
            ("network_pool_timeout_seconds", self.network_pool_timeout_seconds),
            ("network_pool_refresh_seconds", self.network_pool_refresh_seconds),
            (
                "network_pool_list_refresh_seconds",
                self.network_pool_list_refresh_seconds,
            ),
        ];
        for (field, value) in rates {
            if value == 0 {
                return Err(anyhow!("{} must be greater than zero", field));
            }
        }

        let percent = self.min_actionable_mode_consensus_percent;
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(anyhow!(
                "min_actionable_mode_consensus_percent must be between 0 and 100, got {}",
                percent
            ));
        }

        if self.mode_fuzzing > defaults::MAX_MODE_FUZZING {
            return Err(anyhow!(
                "mode_fuzzing must be at most {}, got {}",
                defaults::MAX_MODE_FUZZING,
                self.mode_fuzzing
            ));
        }

        if self.max_concurrent_requests == Some(0) {
            return Err(anyhow!("max_concurrent_requests must be greater than zero"));
        }

        Ok(())
    }

    pub fn thresholds(&self) -> DecisionThresholds {
        DecisionThresholds {
            max_failover_deviance: self.service_node_max_failover_deviance,
            max_alert_deviance: self.service_node_max_alert_deviance,
            min_consensus_percent: self.min_actionable_mode_consensus_percent,
            min_non_consensus_seconds: self.min_actionable_non_consensus_seconds,
        }
    }

    /// Enabled service nodes, in name order
    pub fn monitored_targets(&self) -> Vec<MonitoredTarget> {
        self.service_nodes
            .iter()
            .filter(|(_, node)| node.enabled)
            .map(|(name, node)| MonitoredTarget {
                name: name.clone(),
                host: node.host.clone(),
                port: node.port,
            })
            .collect()
    }

    #[inline]
    pub fn is_monitored(&self, name: &str) -> bool {
        self.service_nodes
            .get(name)
            .map(|node| node.enabled)
            .unwrap_or(false)
    }

    pub fn service_node_timeout(&self) -> Duration {
        Duration::from_secs(self.service_node_timeout_seconds)
    }

    pub fn network_pool_timeout(&self) -> Duration {
        Duration::from_secs(self.network_pool_timeout_seconds)
    }

    pub fn concurrency_limit(&self) -> usize {
        self.max_concurrent_requests
            .unwrap_or(defaults::MAX_CONCURRENT_REQUESTS)
    }

    pub fn bootstrap_retry_delay(&self) -> Duration {
        self.bootstrap_retry_seconds
            .map(Duration::from_secs)
            .unwrap_or(crate::constants::bootstrap::RETRY_DELAY)
    }
}
