//! Raw event → [`Record`].
//!
//! Base fields come from the page context, the clock, and the owning
//! session. Record ids follow a per-kind strategy:
//!
//! - errors get a deterministic fingerprint of type, message, file and line;
//! - behavior ids are the 13-digit capture time plus six random digits;
//! - vitals keep a host-supplied metric id or get `<prefix>-<millis>`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

use lookout_core::constants::{
    BEHAVIOR_ID_SUFFIX_DIGITS, ERROR_ID_LENGTH, SESSION_TOKEN_LENGTH, UNKNOWN_MESSAGE,
    UNKNOWN_PAGE_URL,
};
use lookout_core::models::ErrorDetail;
use lookout_core::traits::{IPageContext, IRandom};
use lookout_core::{Record, RecordDetail, Severity};

/// A partially built record, as produced by an event source.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    pub message: String,
    pub level: Option<Severity>,
    pub target: Option<String>,
    pub custom_data: Option<Value>,
    /// Host-supplied id. Only vitals honor it.
    pub record_id: Option<String>,
    pub detail: RecordDetail,
}

impl RecordDraft {
    pub fn new(message: impl Into<String>, detail: RecordDetail) -> Self {
        Self {
            message: message.into(),
            level: None,
            target: None,
            custom_data: None,
            record_id: None,
            detail,
        }
    }

    pub fn with_level(mut self, level: Severity) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_custom_data(mut self, data: Value) -> Self {
        self.custom_data = Some(data);
        self
    }

    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }
}

/// Per-collector normalization settings.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    user_id: String,
    custom_data: Option<Value>,
}

impl Normalizer {
    pub fn new(user_id: Option<String>, custom_data: Option<Value>) -> Self {
        Self {
            user_id: user_id.unwrap_or_default(),
            custom_data,
        }
    }

    /// Build a record. Never fails: missing pieces fall back to defaults.
    pub fn normalize(
        &self,
        draft: RecordDraft,
        session_id: &str,
        now: i64,
        page: &dyn IPageContext,
        random: &dyn IRandom,
    ) -> Record {
        let message = if draft.message.trim().is_empty() {
            UNKNOWN_MESSAGE.to_string()
        } else {
            draft.message
        };
        let url = non_empty_or(page.page_url(), UNKNOWN_PAGE_URL);

        let mut detail = draft.detail;
        let record_id = match &mut detail {
            RecordDetail::Error(d) => error_fingerprint(d, &message),
            RecordDetail::Behavior(d) => {
                if d.page_load_time.is_none() {
                    d.page_load_time = Some(round2(page.since_navigation_ms()));
                }
                behavior_id(now, random)
            }
            RecordDetail::Vital(d) => {
                let id = draft
                    .record_id
                    .filter(|id| !id.is_empty())
                    .or_else(|| Some(d.metric_id.clone()).filter(|id| !id.is_empty()))
                    .unwrap_or_else(|| vital_id(d.name.as_str(), now, None));
                d.metric_id = id.clone();
                id
            }
        };

        Record {
            record_id,
            level: draft.level,
            message,
            target: draft.target,
            timestamp: now,
            url,
            user_agent: page.user_agent(),
            session_id: session_id.to_string(),
            user_id: self.user_id.clone(),
            custom_data: draft.custom_data.or_else(|| self.custom_data.clone()),
            detail,
        }
    }
}

/// Deterministic error id: base64 of `type_message_filename_lineno` with
/// non-alphanumerics stripped, truncated to 16 chars. Keys outside Latin-1
/// are percent-encoded before encoding. Missing parts render as
/// `undefined` so ids stay stable across hosts.
pub fn error_fingerprint(detail: &ErrorDetail, message: &str) -> String {
    let filename = detail.filename.as_deref().unwrap_or("undefined");
    let lineno = detail
        .lineno
        .map(|n| n.to_string())
        .unwrap_or_else(|| "undefined".to_string());
    let key = format!(
        "{}_{}_{}_{}",
        detail.error_type.as_str(),
        message,
        filename,
        lineno
    );

    let bytes: Vec<u8> = if key.chars().all(|c| (c as u32) <= 0xFF) {
        key.chars().map(|c| c as u8).collect()
    } else {
        encode_uri_component(&key).into_bytes()
    };

    let mut id: String = STANDARD
        .encode(bytes)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    id.truncate(ERROR_ID_LENGTH);
    if id.is_empty() {
        id.push('0');
    }
    id
}

/// Numeric behavior id: epoch millis followed by six zero-padded random digits.
pub fn behavior_id(now: i64, random: &dyn IRandom) -> String {
    let suffix = random.next_below(10u64.pow(BEHAVIOR_ID_SUFFIX_DIGITS as u32));
    format!(
        "{now}{suffix:0width$}",
        width = BEHAVIOR_ID_SUFFIX_DIGITS
    )
}

/// `<prefix>-<millis>` with an optional random tail.
pub fn vital_id(prefix: &str, now: i64, random: Option<&dyn IRandom>) -> String {
    match random {
        Some(r) => format!("{prefix}-{now}-{}", r.next_below(1_000_000_000)),
        None => format!("{prefix}-{now}"),
    }
}

/// `session_<millis>_<9 random alphanumerics>`.
pub fn new_session_id(now: i64) -> String {
    let token: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SESSION_TOKEN_LENGTH)
        .collect();
    format!("session_{now}_{token}")
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn round2(value: f64) -> f64 {
    if value.is_finite() {
        (value * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Bytes `encodeURIComponent` leaves alone: alphanumerics and `-_.!~*'()`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}
