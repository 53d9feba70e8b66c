//! Health check evaluation
//!
//! Turns the latest observations into an UP/DOWN answer for one node or
//! one reference pool.

pub mod evaluator;
pub mod policy;

pub use evaluator::{StatusEvaluator, StatusReport, StatusRequest};
pub use policy::{decide, DecisionInput, DecisionThresholds, HealthState};
