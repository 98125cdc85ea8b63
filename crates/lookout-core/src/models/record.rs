//! The normalized telemetry record shared by all three collectors.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::behavior_detail::BehaviorDetail;
use super::error_detail::ErrorDetail;
use super::severity::Severity;
use super::vital_detail::VitalDetail;

/// Which collector produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Error,
    Behavior,
    Vital,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Behavior => "behavior",
            Self::Vital => "vital",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind-specific payload. Serialized under a single key named after the kind
/// (`"error"`, `"behavior"`, `"vital"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordDetail {
    Error(ErrorDetail),
    Behavior(BehaviorDetail),
    Vital(VitalDetail),
}

impl RecordDetail {
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Error(_) => RecordKind::Error,
            Self::Behavior(_) => RecordKind::Behavior,
            Self::Vital(_) => RecordKind::Vital,
        }
    }

    /// Sub-type used for default severities and stats grouping:
    /// the error type, the behavior type, or the vital metric name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Error(d) => d.error_type.as_str(),
            Self::Behavior(d) => d.behavior_type.as_str(),
            Self::Vital(d) => d.name.as_str(),
        }
    }
}

/// A normalized telemetry event.
///
/// Created by the normalizer at observation time. Past the policy filter it
/// always carries a non-empty `record_id`, `timestamp`, and `url`. Only
/// `level` is filled in afterwards, by policy, when the source left it unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub record_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Severity>,
    /// Error message, behavior action, or vital metric name.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub timestamp: i64,
    pub url: String,
    pub user_agent: String,
    pub session_id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<serde_json::Value>,
    #[serde(flatten)]
    pub detail: RecordDetail,
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        self.detail.kind()
    }

    pub fn category(&self) -> &'static str {
        self.detail.category()
    }

    pub fn as_error(&self) -> Option<&ErrorDetail> {
        match &self.detail {
            RecordDetail::Error(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_behavior(&self) -> Option<&BehaviorDetail> {
        match &self.detail {
            RecordDetail::Behavior(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_vital(&self) -> Option<&VitalDetail> {
        match &self.detail {
            RecordDetail::Vital(d) => Some(d),
            _ => None,
        }
    }

    /// Look up a key in `custom_data`, if it is an object.
    pub fn custom_field(&self, key: &str) -> Option<&serde_json::Value> {
        self.custom_data.as_ref().and_then(|v| v.get(key))
    }
}
