use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::Record;
use super::severity::Severity;

/// Aggregate view over a collector's ring buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
    pub total: usize,
    /// Count per category; every known category is present, zero or not.
    pub by_type: BTreeMap<String, usize>,
    pub by_level: BTreeMap<Severity, usize>,
    /// Most recent records, oldest first.
    pub recent: Vec<Record>,
    /// Present for collectors that track sessions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_duration: Option<i64>,
}

impl RecordStats {
    pub fn count_for(&self, category: &str) -> usize {
        self.by_type.get(category).copied().unwrap_or(0)
    }

    pub fn count_at(&self, level: Severity) -> usize {
        self.by_level.get(&level).copied().unwrap_or(0)
    }
}
