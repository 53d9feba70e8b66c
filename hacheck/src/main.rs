// File: hacheck/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use hacheck::clock::{Clock, SystemClock};
use hacheck::config::ConfigManager;
use hacheck::consensus::ConsensusStateStore;
use hacheck::constants::CONFIG_DIR_ENV;
use hacheck::poller::HeightPoller;
use hacheck::status::StatusEvaluator;
use hacheck::web::{start_web_server, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("hacheck=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting blockchain node health check service");

    // Load configuration
    let config_dir = std::env::var(CONFIG_DIR_ENV)
        .ok()
        .or_else(|| std::env::args().nth(1))
        .unwrap_or_else(|| "config".to_string());
    let config_manager = ConfigManager::new(config_dir).await?;
    let config = config_manager.get_current_config();
    info!(
        "Configuration loaded: {} service nodes, pool list {}",
        config.service_nodes.len(),
        config.pool_list_url
    );

    let store = Arc::new(ConsensusStateStore::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Nothing is served until the first full refresh succeeds
    let poller = HeightPoller::new(config.clone(), store.clone(), clock.clone())?;
    poller.bootstrap().await;

    for handle in poller.spawn_background_tasks() {
        tokio::spawn(async move {
            if let Err(e) = handle.await {
                error!("Refresh loop stopped: {}", e);
            }
        });
    }
    info!("Background refresh tasks started");

    let evaluator = Arc::new(StatusEvaluator::new(config.clone(), store.clone(), clock));
    let state = AppState::new(config, store, evaluator);

    // Start web server
    start_web_server(state).await?;

    Ok(())
}
