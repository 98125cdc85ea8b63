use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::models::Severity;
use crate::patterns::IgnorePattern;

/// The filtering and retention rules a collector pipeline applies.
///
/// Each monitor config projects itself into one of these; the pipeline never
/// reads the monitor-specific structs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Matched against the record message.
    pub ignore_messages: Vec<IgnorePattern>,
    /// Matched against the page url and, for errors, the source filename.
    pub ignore_urls: Vec<IgnorePattern>,
    /// Matched against the record target (element selector, resource url).
    pub ignore_targets: Vec<IgnorePattern>,
    /// Fraction of accepted records that are report-eligible, in `[0, 1]`.
    pub sample_rate: f64,
    /// Ring buffer capacity.
    pub max_records: usize,
    /// Severity assigned by category when the source leaves it unset.
    pub level_defaults: BTreeMap<String, Severity>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            ignore_messages: Vec::new(),
            ignore_urls: Vec::new(),
            ignore_targets: Vec::new(),
            sample_rate: defaults::DEFAULT_SAMPLE_RATE,
            max_records: defaults::DEFAULT_MAX_BEHAVIORS,
            level_defaults: BTreeMap::new(),
        }
    }
}
