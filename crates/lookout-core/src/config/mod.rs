pub mod batch_config;
pub mod behavior_config;
pub mod defaults;
pub mod error_config;
pub mod merge;
pub mod policy_config;
pub mod vitals_config;

pub use batch_config::BatchConfig;
pub use behavior_config::{
    BehaviorMonitorConfig, ClickConfig, FocusConfig, InputConfig, PageConfig, ScrollConfig,
    SessionConfig,
};
pub use error_config::ErrorMonitorConfig;
pub use merge::merge_shallow;
pub use policy_config::PolicyConfig;
pub use vitals_config::{
    FpsConfig, LongTaskConfig, MemoryConfig, MemoryLeakConfig, VitalsMonitorConfig,
    VitalsThresholds,
};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Top-level configuration aggregating all three collectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookoutConfig {
    pub error: ErrorMonitorConfig,
    pub behavior: BehaviorMonitorConfig,
    pub vitals: VitalsMonitorConfig,
}

impl LookoutConfig {
    /// Load from a TOML string. Missing sections and keys take defaults.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseFailed {
            reason: e.to_string(),
        })
    }
}

/// Resolve an endpoint: the configured value, then `env_var`, then `builtin`.
/// Blank strings count as unset.
pub fn resolve_report_url(
    configured: Option<&str>,
    env_var: &str,
    builtin: Option<&str>,
) -> Option<String> {
    configured
        .filter(|u| !u.trim().is_empty())
        .map(str::to_string)
        .or_else(|| {
            std::env::var(env_var)
                .ok()
                .filter(|u| !u.trim().is_empty())
        })
        .or_else(|| builtin.map(str::to_string))
}
