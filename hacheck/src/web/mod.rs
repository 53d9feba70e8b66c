pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use std::sync::Arc;

use crate::config::Config;
use crate::consensus::ConsensusStateStore;
use crate::status::StatusEvaluator;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<ConsensusStateStore>,
    pub evaluator: Arc<StatusEvaluator>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        store: Arc<ConsensusStateStore>,
        evaluator: Arc<StatusEvaluator>,
    ) -> Self {
        Self {
            config,
            store,
            evaluator,
        }
    }
}
