use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use super::{resolve_report_url, BatchConfig, PolicyConfig};
use crate::constants;
use crate::models::{BehaviorType, Severity};
use crate::patterns::IgnorePattern;

/// Behavior collector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorMonitorConfig {
    pub enable_console_log: bool,
    pub enable_report: bool,
    /// No built-in default: reporting stays off until a url resolves.
    pub report_url: Option<String>,
    pub batch: BatchConfig,
    /// Matched against the behavior action.
    pub ignore_behaviors: Vec<IgnorePattern>,
    /// Matched against the element selector (`tag#id.class`).
    pub ignore_elements: Vec<IgnorePattern>,
    pub max_behaviors: usize,
    pub sample_rate: f64,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub custom_data: Option<serde_json::Value>,
    pub level_config: BTreeMap<String, Severity>,
    pub click: ClickConfig,
    pub scroll: ScrollConfig,
    pub input: InputConfig,
    pub focus: FocusConfig,
    pub page: PageConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    pub enabled: bool,
    pub debounce_ms: u64,
    /// Capture up to 100 characters of element text.
    pub track_text: bool,
    /// Capture pointer position, element rect and scroll offset.
    pub track_position: bool,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: defaults::DEFAULT_CLICK_DEBOUNCE_MS,
            track_text: true,
            track_position: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub enabled: bool,
    pub throttle_ms: u64,
    pub track_direction: bool,
    pub track_speed: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            throttle_ms: defaults::DEFAULT_SCROLL_THROTTLE_MS,
            track_direction: true,
            track_speed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub enabled: bool,
    /// Per-field debounce.
    pub debounce_ms: u64,
    /// Record the field value. Never applies to sensitive fields.
    pub track_value: bool,
    /// Case-insensitive substrings of a field name or id that mark it sensitive.
    pub sensitive_fields: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: defaults::DEFAULT_INPUT_DEBOUNCE_MS,
            track_value: false,
            sensitive_fields: defaults::DEFAULT_SENSITIVE_FIELDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    pub enabled: bool,
    pub track_blur: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            track_blur: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub enabled: bool,
    pub track_page_view: bool,
    pub track_navigation: bool,
    pub track_resize: bool,
    pub resize_debounce_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            track_page_view: true,
            track_navigation: true,
            track_resize: true,
            resize_debounce_ms: defaults::DEFAULT_RESIZE_DEBOUNCE_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub enabled: bool,
    /// Idle gap after which the session rotates (milliseconds).
    pub timeout_ms: u64,
    /// How often the idle check runs (milliseconds).
    pub check_interval_ms: u64,
    pub track_session_start: bool,
    pub track_session_end: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: defaults::DEFAULT_SESSION_TIMEOUT_MS,
            check_interval_ms: defaults::DEFAULT_SESSION_CHECK_INTERVAL_MS,
            track_session_start: true,
            track_session_end: true,
        }
    }
}

impl BehaviorMonitorConfig {
    pub fn default_levels() -> BTreeMap<String, Severity> {
        use BehaviorType::*;
        [
            (Click, Severity::Medium),
            (Scroll, Severity::Low),
            (Input, Severity::Medium),
            (Focus, Severity::Low),
            (Blur, Severity::Low),
            (Resize, Severity::Low),
            (Navigation, Severity::High),
            (PageView, Severity::High),
            (SessionStart, Severity::High),
            (SessionEnd, Severity::High),
            (Custom, Severity::Low),
        ]
        .into_iter()
        .map(|(t, s)| (t.as_str().to_string(), s))
        .collect()
    }

    pub fn policy(&self) -> PolicyConfig {
        // Behavior patterns apply to the target as well as the action.
        let mut ignore_targets = self.ignore_behaviors.clone();
        ignore_targets.extend(self.ignore_elements.iter().cloned());
        PolicyConfig {
            ignore_messages: self.ignore_behaviors.clone(),
            ignore_urls: Vec::new(),
            ignore_targets,
            sample_rate: self.sample_rate,
            max_records: self.max_behaviors,
            level_defaults: self.level_config.clone(),
        }
    }

    /// Configured url, then `LOOKOUT_BEHAVIOR_REPORT_URL`.
    pub fn resolved_report_url(&self) -> Option<String> {
        resolve_report_url(
            self.report_url.as_deref(),
            constants::BEHAVIOR_REPORT_URL_ENV,
            None,
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

impl Default for BehaviorMonitorConfig {
    fn default() -> Self {
        Self {
            enable_console_log: defaults::DEFAULT_ENABLE_CONSOLE_LOG,
            enable_report: defaults::DEFAULT_ENABLE_REPORT,
            report_url: None,
            batch: BatchConfig {
                enabled: defaults::DEFAULT_BEHAVIOR_BATCH_ENABLED,
                ..BatchConfig::default()
            },
            ignore_behaviors: Vec::new(),
            ignore_elements: Vec::new(),
            max_behaviors: defaults::DEFAULT_MAX_BEHAVIORS,
            sample_rate: defaults::DEFAULT_SAMPLE_RATE,
            user_id: None,
            session_id: None,
            custom_data: None,
            level_config: Self::default_levels(),
            click: ClickConfig::default(),
            scroll: ScrollConfig::default(),
            input: InputConfig::default(),
            focus: FocusConfig::default(),
            page: PageConfig::default(),
            session: SessionConfig::default(),
        }
    }
}
