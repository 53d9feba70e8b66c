//! Test configuration builder for creating config directories programmatically

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Builder for a config directory with `main.toml` and node group files
pub struct TestConfigBuilder {
    temp_dir: TempDir,
    main_config: MainConfigBuilder,
    groups: BTreeMap<String, Vec<NodeEntry>>,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            main_config: MainConfigBuilder::default(),
            groups: BTreeMap::new(),
        }
    }

    /// Configure main settings
    pub fn with_main_config<F>(mut self, f: F) -> Self
    where
        F: FnOnce(MainConfigBuilder) -> MainConfigBuilder,
    {
        self.main_config = f(self.main_config);
        self
    }

    /// Add a node to `<group>.toml`
    pub fn with_node(mut self, group: &str, id: &str, host: &str, port: u16, enabled: bool) -> Self {
        self.groups.entry(group.to_string()).or_default().push(NodeEntry {
            id: id.to_string(),
            host: host.to_string(),
            port,
            enabled,
        });
        self
    }

    /// Build and write config files to the temp directory
    pub fn build(self) -> TestConfig {
        let config_dir = self.temp_dir.path().join("config");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        fs::write(config_dir.join("main.toml"), self.main_config.to_toml())
            .expect("Failed to write main.toml");

        for (group, nodes) in self.groups {
            let mut toml = String::new();
            for node in nodes {
                toml.push_str(&node.to_toml());
            }
            fs::write(config_dir.join(format!("{}.toml", group)), toml)
                .expect("Failed to write group config");
        }

        TestConfig {
            _temp_dir: self.temp_dir,
            config_dir,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `main.toml` builder
#[derive(Clone)]
pub struct MainConfigBuilder {
    pool_list_url: String,
    timeout_seconds: u64,
    max_failover_deviance: u64,
    max_alert_deviance: u64,
    min_consensus_percent: f64,
    min_non_consensus_seconds: u64,
    mode_fuzzing: u64,
    max_concurrent_requests: usize,
}

impl MainConfigBuilder {
    pub fn pool_list_url(mut self, url: &str) -> Self {
        self.pool_list_url = url.to_string();
        self
    }

    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn deviances(mut self, failover: u64, alert: u64) -> Self {
        self.max_failover_deviance = failover;
        self.max_alert_deviance = alert;
        self
    }

    pub fn min_consensus_percent(mut self, percent: f64) -> Self {
        self.min_consensus_percent = percent;
        self
    }

    pub fn min_non_consensus_seconds(mut self, seconds: u64) -> Self {
        self.min_non_consensus_seconds = seconds;
        self
    }

    pub fn mode_fuzzing(mut self, fuzz: u64) -> Self {
        self.mode_fuzzing = fuzz;
        self
    }

    pub fn max_concurrent_requests(mut self, limit: usize) -> Self {
        self.max_concurrent_requests = limit;
        self
    }

    fn to_toml(&self) -> String {
        format!(
            r#"
host = "127.0.0.1"
port = 0
pool_list_url = "{}"
service_node_timeout_seconds = {}
network_pool_timeout_seconds = {}
service_node_max_failover_deviance = {}
service_node_max_alert_deviance = {}
min_actionable_mode_consensus_percent = {:.1}
min_actionable_non_consensus_seconds = {}
mode_fuzzing = {}
max_concurrent_requests = {}
bootstrap_retry_seconds = 1
"#,
            self.pool_list_url,
            self.timeout_seconds,
            self.timeout_seconds,
            self.max_failover_deviance,
            self.max_alert_deviance,
            self.min_consensus_percent,
            self.min_non_consensus_seconds,
            self.mode_fuzzing,
            self.max_concurrent_requests
        )
    }
}

impl Default for MainConfigBuilder {
    fn default() -> Self {
        Self {
            pool_list_url: "http://127.0.0.1:9/pools.json".to_string(),
            timeout_seconds: 2,
            max_failover_deviance: 10,
            max_alert_deviance: 10,
            min_consensus_percent: 50.0,
            min_non_consensus_seconds: 300,
            mode_fuzzing: 0,
            max_concurrent_requests: 16,
        }
    }
}

struct NodeEntry {
    id: String,
    host: String,
    port: u16,
    enabled: bool,
}

impl NodeEntry {
    fn to_toml(&self) -> String {
        format!(
            r#"
[nodes.{}]
host = "{}"
port = {}
enabled = {}
"#,
            self.id, self.host, self.port, self.enabled
        )
    }
}

/// Written config directory; removed when dropped
pub struct TestConfig {
    _temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestConfig {
    pub fn dir(&self) -> String {
        self.config_dir.to_string_lossy().to_string()
    }
}
