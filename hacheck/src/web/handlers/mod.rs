//! HTTP request handlers.
//!
//! - `common` - Shared response types, query parsing and error mapping
//! - `hacheck` - Health check endpoints consumed by HAProxy
//! - `heights` - Snapshot listings of the current observations

pub mod common;
pub mod hacheck;
pub mod heights;

pub use self::hacheck::*;
pub use self::heights::*;
