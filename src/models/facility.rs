//! Facility-level settings supplied by the configuration layer.

use serde::{Deserialize, Serialize};

/// Facility configuration consumed by the analytics services.
///
/// Loaded from the `[facility]` section of `orsi.toml`; every field has a
/// default so a missing section yields a usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacilityConfig {
    /// OR time cost in dollars per hour
    #[serde(default = "default_or_hourly_rate")]
    pub or_hourly_rate: f64,
    /// Grace window for First Case On-Time Start, in minutes
    #[serde(default = "default_fcots_grace_minutes")]
    pub fcots_grace_minutes: f64,
    /// Target OR utilization percentage
    #[serde(default = "default_utilization_target_percent")]
    pub utilization_target_percent: f64,
}

fn default_or_hourly_rate() -> f64 {
    2400.0
}

fn default_fcots_grace_minutes() -> f64 {
    7.0
}

fn default_utilization_target_percent() -> f64 {
    75.0
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            or_hourly_rate: default_or_hourly_rate(),
            fcots_grace_minutes: default_fcots_grace_minutes(),
            utilization_target_percent: default_utilization_target_percent(),
        }
    }
}
