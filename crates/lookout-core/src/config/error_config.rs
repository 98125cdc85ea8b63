use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use super::{resolve_report_url, BatchConfig, PolicyConfig};
use crate::constants;
use crate::models::{ErrorType, Severity};
use crate::patterns::IgnorePattern;

/// Error collector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErrorMonitorConfig {
    pub enable_console_log: bool,
    pub enable_report: bool,
    /// Single-record endpoint. Resolved through the env and built-in default
    /// when unset.
    pub report_url: Option<String>,
    pub batch: BatchConfig,
    /// Matched against the error message.
    pub ignore_errors: Vec<IgnorePattern>,
    /// Matched against the page url and the script filename.
    pub ignore_urls: Vec<IgnorePattern>,
    /// Ring buffer capacity.
    pub max_errors: usize,
    pub sample_rate: f64,
    pub user_id: Option<String>,
    /// Session id seed. A fresh id is generated when unset.
    pub session_id: Option<String>,
    /// Attached to every record that carries none of its own.
    pub custom_data: Option<serde_json::Value>,
    /// Severity per error type name.
    pub level_config: BTreeMap<String, Severity>,
}

impl ErrorMonitorConfig {
    pub fn default_levels() -> BTreeMap<String, Severity> {
        [
            (ErrorType::Javascript, Severity::High),
            (ErrorType::Component, Severity::High),
            (ErrorType::Promise, Severity::Medium),
            (ErrorType::Resource, Severity::Medium),
            (ErrorType::Ajax, Severity::Medium),
            (ErrorType::Custom, Severity::Low),
        ]
        .into_iter()
        .map(|(t, s)| (t.as_str().to_string(), s))
        .collect()
    }

    pub fn policy(&self) -> PolicyConfig {
        PolicyConfig {
            ignore_messages: self.ignore_errors.clone(),
            ignore_urls: self.ignore_urls.clone(),
            ignore_targets: Vec::new(),
            sample_rate: self.sample_rate,
            max_records: self.max_errors,
            level_defaults: self.level_config.clone(),
        }
    }

    /// Configured url, then `LOOKOUT_ERROR_REPORT_URL`, then the built-in default.
    pub fn resolved_report_url(&self) -> Option<String> {
        resolve_report_url(
            self.report_url.as_deref(),
            constants::ERROR_REPORT_URL_ENV,
            Some(defaults::DEFAULT_ERROR_REPORT_URL),
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

impl Default for ErrorMonitorConfig {
    fn default() -> Self {
        Self {
            enable_console_log: defaults::DEFAULT_ENABLE_CONSOLE_LOG,
            enable_report: defaults::DEFAULT_ENABLE_REPORT,
            report_url: None,
            batch: BatchConfig {
                enabled: defaults::DEFAULT_ERROR_BATCH_ENABLED,
                ..BatchConfig::default()
            },
            ignore_errors: Vec::new(),
            ignore_urls: Vec::new(),
            max_errors: defaults::DEFAULT_MAX_ERRORS,
            sample_rate: defaults::DEFAULT_SAMPLE_RATE,
            user_id: None,
            session_id: None,
            custom_data: None,
            level_config: Self::default_levels(),
        }
    }
}
