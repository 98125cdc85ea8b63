use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use super::{resolve_report_url, BatchConfig, PolicyConfig};
use crate::constants;
use crate::models::Severity;

/// Vitals collector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalsMonitorConfig {
    pub enable_console_log: bool,
    pub enable_report: bool,
    pub report_url: Option<String>,
    pub batch: BatchConfig,
    pub max_vitals: usize,
    pub sample_rate: f64,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub custom_data: Option<serde_json::Value>,
    pub thresholds: VitalsThresholds,
    pub fps: FpsConfig,
    pub long_task: LongTaskConfig,
    pub memory_leak: MemoryLeakConfig,
    pub memory: MemoryConfig,
}

/// "Good" upper bounds. Needs-improvement extends to 1.5x.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalsThresholds {
    pub lcp: f64,
    pub cls: f64,
    pub fcp: f64,
    pub ttfb: f64,
    pub inp: f64,
    pub fps: f64,
    pub long_task: f64,
}

impl Default for VitalsThresholds {
    fn default() -> Self {
        Self {
            lcp: defaults::DEFAULT_LCP_THRESHOLD_MS,
            cls: defaults::DEFAULT_CLS_THRESHOLD,
            fcp: defaults::DEFAULT_FCP_THRESHOLD_MS,
            ttfb: defaults::DEFAULT_TTFB_THRESHOLD_MS,
            inp: defaults::DEFAULT_INP_THRESHOLD_MS,
            fps: defaults::DEFAULT_FPS_THRESHOLD,
            long_task: defaults::DEFAULT_LONG_TASK_THRESHOLD_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FpsConfig {
    pub enabled: bool,
    /// Total sampling window (milliseconds).
    pub duration_ms: u64,
    pub sample_interval_ms: u64,
}

impl Default for FpsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: defaults::DEFAULT_FPS_DURATION_MS,
            sample_interval_ms: defaults::DEFAULT_FPS_SAMPLE_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongTaskConfig {
    pub enabled: bool,
    /// Minimum duration for an entry to count (milliseconds).
    pub threshold_ms: f64,
    /// Retained task list length.
    pub max_tasks: usize,
    pub include_attribution: bool,
}

impl Default for LongTaskConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_ms: defaults::DEFAULT_LONG_TASK_THRESHOLD_MS,
            max_tasks: defaults::DEFAULT_LONG_TASK_MAX_TASKS,
            include_attribution: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryLeakConfig {
    pub enabled: bool,
    pub interval_ms: u64,
    /// Usage percentage rated needs-improvement.
    pub warning_threshold: f64,
    /// Usage percentage rated poor.
    pub danger_threshold: f64,
    /// Samples retained for the trend and summary.
    pub trend_window_size: usize,
    /// Growth rate that earns the full growth score (MB/min).
    pub growth_rate_threshold: f64,
    /// Hard ceiling after which sampling stops (milliseconds).
    pub max_monitoring_duration_ms: u64,
}

impl Default for MemoryLeakConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: defaults::DEFAULT_LEAK_INTERVAL_MS,
            warning_threshold: defaults::DEFAULT_LEAK_WARNING_PERCENT,
            danger_threshold: defaults::DEFAULT_LEAK_DANGER_PERCENT,
            trend_window_size: defaults::DEFAULT_LEAK_TREND_WINDOW,
            growth_rate_threshold: defaults::DEFAULT_LEAK_GROWTH_MB_PER_MIN,
            max_monitoring_duration_ms: defaults::DEFAULT_LEAK_MAX_DURATION_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Off by default; started manually by the host.
    pub enabled: bool,
    pub interval_ms: u64,
    pub duration_ms: u64,
    /// Growth between samples that raises an alert (MB/s).
    pub growth_rate_threshold: f64,
    /// Usage percentage that raises an alert.
    pub usage_threshold: f64,
    pub max_samples: usize,
    pub detect_leaks: bool,
    pub leak_detection_window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: defaults::DEFAULT_MEMORY_INTERVAL_MS,
            duration_ms: defaults::DEFAULT_MEMORY_DURATION_MS,
            growth_rate_threshold: defaults::DEFAULT_MEMORY_GROWTH_MB_PER_SEC,
            usage_threshold: defaults::DEFAULT_MEMORY_USAGE_PERCENT,
            max_samples: defaults::DEFAULT_MEMORY_MAX_SAMPLES,
            detect_leaks: true,
            leak_detection_window: defaults::DEFAULT_MEMORY_LEAK_WINDOW,
        }
    }
}

impl VitalsMonitorConfig {
    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig {
            ignore_messages: Vec::new(),
            ignore_urls: Vec::new(),
            ignore_targets: Vec::new(),
            sample_rate: self.sample_rate,
            max_records: self.max_vitals,
            level_defaults: BTreeMap::<String, Severity>::new(),
        }
    }

    /// Configured url, then `LOOKOUT_VITALS_REPORT_URL`, then the built-in default.
    pub fn resolved_report_url(&self) -> Option<String> {
        resolve_report_url(
            self.report_url.as_deref(),
            constants::VITALS_REPORT_URL_ENV,
            Some(defaults::DEFAULT_VITALS_REPORT_URL),
        )
    }

    pub fn resolved_batch_url(&self) -> Option<String> {
        self.batch
            .batch_report_url
            .clone()
            .filter(|u| !u.trim().is_empty())
            .or_else(|| self.resolved_report_url())
    }
}

impl Default for VitalsMonitorConfig {
    fn default() -> Self {
        Self {
            enable_console_log: defaults::DEFAULT_ENABLE_CONSOLE_LOG,
            enable_report: defaults::DEFAULT_ENABLE_REPORT,
            report_url: None,
            batch: BatchConfig {
                enabled: defaults::DEFAULT_VITALS_BATCH_ENABLED,
                ..BatchConfig::default()
            },
            max_vitals: defaults::DEFAULT_MAX_VITALS,
            sample_rate: defaults::DEFAULT_SAMPLE_RATE,
            user_id: None,
            session_id: None,
            custom_data: None,
            thresholds: VitalsThresholds::default(),
            fps: FpsConfig::default(),
            long_task: LongTaskConfig::default(),
            memory_leak: MemoryLeakConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}
