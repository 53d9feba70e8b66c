//! This module provides reusable test utilities:
//! - Mock HTTP servers (service node daemon, pool APIs, pool directory)
//! - Test configuration builders
//! - Common test data

// Allow unused code in test fixtures - not every test binary uses every helper
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod mock_daemon;
pub mod mock_pool;
pub mod test_config;
pub mod test_data;

// Re-export commonly used items
pub use mock_daemon::MockDaemonServer;
pub use mock_pool::{MockPoolDirectory, MockPoolServer};
pub use test_config::TestConfigBuilder;
pub use test_data::*;
