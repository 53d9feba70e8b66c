pub mod clock;
pub mod config;
pub mod consensus;
pub mod constants;
pub mod errors;
pub mod poller;
pub mod status;
pub mod upstream;
pub mod web;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigManager, ServiceNodeConfig};
pub use consensus::{ConsensusStateStore, GroupKind, ObservationGroup};
pub use errors::{HaCheckError, UpstreamError};
pub use poller::HeightPoller;
pub use status::{HealthState, StatusEvaluator};
pub use web::AppState;
