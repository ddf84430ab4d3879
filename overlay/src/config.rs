//! Service timing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing knobs for the overlay service.
///
/// Durations are written as whole milliseconds:
///
/// ```json
/// { "focus_settle_ms": 10, "guard_interval_ms": 1000, "correction_delay_ms": 100 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Delay between an overlay closing and focus returning, so the
    /// overlay's teardown finishes first.
    #[serde(rename = "focus_settle_ms", with = "millis")]
    pub focus_settle: Duration,
    /// Pointer guard correction interval. Values below
    /// [`MIN_INTERVAL`](crate::guard::MIN_INTERVAL) are raised to it.
    #[serde(rename = "guard_interval_ms", with = "millis")]
    pub guard_interval: Duration,
    /// Delay before correcting a degrading root mutation.
    #[serde(rename = "correction_delay_ms", with = "millis")]
    pub correction_delay: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            focus_settle: Duration::from_millis(10),
            guard_interval: Duration::from_secs(1),
            correction_delay: Duration::from_millis(100),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
