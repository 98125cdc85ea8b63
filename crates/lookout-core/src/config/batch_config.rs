use serde::{Deserialize, Serialize};

use super::defaults;

/// Batch delivery settings for one collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// When false, every report-eligible record is POSTed on its own.
    pub enabled: bool,
    /// Queue length that triggers an immediate flush.
    pub batch_size: usize,
    /// Maximum time a record waits in the queue (milliseconds).
    pub batch_interval_ms: u64,
    /// Batch endpoint. Falls back to the collector's report url.
    pub batch_report_url: Option<String>,
}

impl BatchConfig {
    /// Batching switched off, other settings at their defaults.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            batch_size: defaults::DEFAULT_BATCH_SIZE,
            batch_interval_ms: defaults::DEFAULT_BATCH_INTERVAL_MS,
            batch_report_url: None,
        }
    }
}
