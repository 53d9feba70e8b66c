//! Central repository for default values and fixed intervals
//!
//! Constants are grouped by concern so config defaults, upstream paths and
//! startup behaviour share a single source of truth.

use std::time::Duration;

/// Upstream endpoint paths
pub mod upstream {
    /// Daemon height query, relative to `http://host:port`
    pub const NODE_HEIGHT_PATH: &str = "/getheight";

    /// Forknote pool stats, relative to the pool API base URL
    pub const FORKNOTE_STATS_PATH: &str = "stats";

    /// Node-JS pool statistics, relative to the pool API base URL
    pub const NODEJS_POOL_STATS_PATH: &str = "pool/stats";

    /// Node-JS network statistics, relative to the pool API base URL
    pub const NODEJS_NETWORK_STATS_PATH: &str = "network/stats";

    /// Pool directory `type` value for Forknote-style APIs
    pub const FORKNOTE_KIND: &str = "forknote";

    /// Pool directory `type` value for Node-JS-pool APIs
    pub const NODEJS_KIND: &str = "node.js";
}

/// Startup constants
pub mod bootstrap {
    use super::Duration;

    /// Delay before the whole bootstrap sequence is attempted again
    pub const RETRY_DELAY: Duration = Duration::from_secs(5);
}

/// Default configuration values
pub mod defaults {
    /// Default HTTP bind host
    pub const HOST: &str = "0.0.0.0";

    /// Default HTTP port
    pub const PORT: u16 = 8080;

    /// Default daemon height timeout in seconds
    pub const SERVICE_NODE_TIMEOUT_SECONDS: u64 = 10;

    /// Default daemon poll interval in seconds
    pub const SERVICE_NODE_REFRESH_SECONDS: u64 = 30;

    /// Default pool API timeout in seconds
    pub const NETWORK_POOL_TIMEOUT_SECONDS: u64 = 10;

    /// Default pool poll interval in seconds
    pub const NETWORK_POOL_REFRESH_SECONDS: u64 = 30;

    /// Default pool directory poll interval in seconds
    pub const NETWORK_POOL_LIST_REFRESH_SECONDS: u64 = 60 * 60;

    /// Default max deviance before a failover check reports DOWN
    pub const MAX_FAILOVER_DEVIANCE: u64 = 10;

    /// Default max deviance before an alert check reports DOWN
    pub const MAX_ALERT_DEVIANCE: u64 = 10;

    /// Default consensus percentage below which the mode is not trusted
    pub const MIN_ACTIONABLE_MODE_CONSENSUS_PERCENT: f64 = 50.0;

    /// Default seconds without a height change before a node counts as frozen
    pub const MIN_ACTIONABLE_NON_CONSENSUS_SECONDS: u64 = 300;

    /// Default fuzz window for the mode calculation
    pub const MODE_FUZZING: u64 = 0;

    /// Largest accepted `mode_fuzzing`; each height votes for `2 * fuzz + 1` candidates
    pub const MAX_MODE_FUZZING: u64 = 500;

    /// Default cap on in-flight upstream calls per refresh
    pub const MAX_CONCURRENT_REQUESTS: usize = 16;
}

/// HTTP surface constants
pub mod http {
    /// Header HAProxy sends with `http-check send-state`
    pub const HAPROXY_STATE_HEADER: &str = "x-haproxy-server-state";
}

/// Environment variable naming the config directory
pub const CONFIG_DIR_ENV: &str = "HACHECK_CONFIG_DIR";
