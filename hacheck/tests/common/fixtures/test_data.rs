//! Common test data and constants

use chrono::{DateTime, TimeZone, Utc};

/// Fixed instant the manual clock starts from
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Common node group names
pub mod groups {
    pub const PUBLIC: &str = "public";
    pub const PRIVATE: &str = "private";
}

/// Common mining addresses
pub mod addresses {
    pub const POOL_A: &str = "TRTLv1poolAaddress";
    pub const POOL_B: &str = "TRTLv1poolBaddress";
    pub const POOL_C: &str = "TRTLv1poolCaddress";
    pub const UNSUPPORTED: &str = "TRTLv1unsupported";
}
