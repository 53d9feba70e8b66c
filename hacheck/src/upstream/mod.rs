//! Upstream clients
//!
//! Read-only HTTP clients for monitored daemons and reference pools. Every
//! call is bounded by its family's timeout and reports failures as
//! `UpstreamError` values.

pub mod json;
pub mod node;
pub mod pool;

pub use node::NodeHeightClient;
pub use pool::PoolStatsClient;
