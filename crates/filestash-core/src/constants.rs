//! Shared constants

use std::time::Duration;

/// Default number of days a stored file is kept before the retention sweep removes it.
pub const DEFAULT_RETENTION_DAYS: i64 = 180;

/// Largest accepted retention threshold (100 years).
pub const MAX_RETENTION_DAYS: i64 = 36_500;

/// Delay between service start and the first retention sweep.
pub const SWEEP_INITIAL_DELAY: Duration = Duration::from_secs(30);

/// Time between the end of one retention sweep and the start of the next.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Blob metadata and tag keys.
pub mod metadata_keys {
    pub const NAME: &str = "name";
    pub const MEDIA_TYPE: &str = "type";
    pub const ENCODING: &str = "encoding";
    pub const SOURCE_APPLICATION_ID: &str = "sourceApplicationId";
    pub const SOURCE_APPLICATION_INSTANCE_ID: &str = "sourceApplicationInstanceId";
}
