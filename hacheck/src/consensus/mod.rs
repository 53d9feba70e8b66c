//! Consensus core
//!
//! Height observations, the fuzzy mode calculator and the shared store
//! that holds the latest result of every refresh.

pub mod mode;
pub mod store;
pub mod types;

pub use mode::compute_consensus;
pub use store::ConsensusStateStore;
pub use types::{
    ConsensusResult, FreshObservation, GroupKind, HeightMark, HeightObservation, MonitoredTarget,
    ObservationGroup, PoolApiKind, PoolDetails, PoolDirectory, PoolSample, ReferencePoolSource,
    TimeEstimate,
};
