//! Raw failure → [`RecordDraft`].
//!
//! Capture never fails. Missing fields stay unset and the normalizer fills
//! in the safe defaults.

use serde_json::{json, Value};

use lookout_core::models::{ErrorDetail, ErrorType, RecordDetail};
use lookout_core::Severity;
use lookout_pipeline::RecordDraft;

use crate::events::{ComponentFailure, HttpFailure, RejectionReason, ResourceFailure, ScriptError};

pub const UNHANDLED_REJECTION: &str = "Unhandled Promise Rejection";
pub const UNKNOWN_COMPONENT: &str = "Unknown";

fn draft(message: String, detail: ErrorDetail) -> RecordDraft {
    RecordDraft::new(message, RecordDetail::Error(detail))
}

pub fn script_error(event: ScriptError) -> RecordDraft {
    let mut detail = ErrorDetail::new(ErrorType::Javascript);
    detail.filename = event.filename;
    detail.lineno = event.lineno;
    detail.colno = event.colno;
    detail.stack = event.stack;
    draft(event.message, detail)
}

pub fn rejection(reason: RejectionReason) -> RecordDraft {
    let mut detail = ErrorDetail::new(ErrorType::Promise);
    let message = match reason {
        RejectionReason::Error { message, stack } => {
            detail.stack = stack;
            message
        }
        RejectionReason::Value(Value::String(s)) => s,
        RejectionReason::Value(v @ (Value::Object(_) | Value::Array(_))) => v.to_string(),
        RejectionReason::Value(_) => UNHANDLED_REJECTION.to_string(),
    };
    draft(message, detail)
}

/// `None` for failures on the document root, which are not resource loads.
pub fn resource_failure(event: ResourceFailure) -> Option<RecordDraft> {
    let node = event.node_name.trim();
    if node.is_empty() || node.eq_ignore_ascii_case("html") || node.eq_ignore_ascii_case("body") {
        return None;
    }
    let resource_type = node.to_ascii_lowercase();
    let resource_url = event
        .src
        .filter(|s| !s.is_empty())
        .or(event.href)
        .unwrap_or_default();

    let mut detail = ErrorDetail::new(ErrorType::Resource);
    detail.resource_type = Some(resource_type.clone());
    detail.resource_url = Some(resource_url.clone());
    let message = format!("Failed to load {resource_type}: {resource_url}");
    Some(draft(message, detail).with_target(resource_url))
}

pub fn component_failure(event: ComponentFailure) -> RecordDraft {
    let mut detail = ErrorDetail::new(ErrorType::Component);
    detail.stack = event.stack;
    detail.component_name = Some(
        event
            .component_name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_COMPONENT.to_string()),
    );
    detail.component_stack = event.info;
    detail.props_data = event.props;
    detail.route = event.route;
    detail.route_params = event.route_params;
    detail.route_query = event.route_query;
    draft(event.message, detail)
}

fn http_detail(event: &HttpFailure) -> ErrorDetail {
    let mut detail = ErrorDetail::new(ErrorType::Ajax);
    detail.request_url = event.url.clone();
    detail.request_method = event.method.clone();
    detail.request_data = event.data.clone();
    detail
}

pub fn http_request_failure(event: HttpFailure) -> RecordDraft {
    let detail = http_detail(&event);
    draft(format!("Request Error: {}", event.message), detail)
}

pub fn http_response_failure(event: HttpFailure, now: i64) -> RecordDraft {
    let mut detail = http_detail(&event);
    detail.response_status = event.status;
    detail.response_data = event.response_data;
    let duration = event.started_at.map_or(0, |t| (now - t).max(0));
    draft(format!("Response Error: {}", event.message), detail).with_custom_data(json!({
        "requestDuration": duration,
        "timeout": event.timed_out,
    }))
}

/// Manually reported error. `customData.errorType` picks the type when it
/// names a known one.
pub fn custom(message: &str, custom_data: Option<Value>, level: Severity) -> RecordDraft {
    let error_type = custom_data
        .as_ref()
        .and_then(|d| d.get("errorType"))
        .and_then(Value::as_str)
        .and_then(ErrorType::parse)
        .unwrap_or(ErrorType::Custom);
    let mut out = draft(message.to_string(), ErrorDetail::new(error_type)).with_level(level);
    if let Some(data) = custom_data {
        out = out.with_custom_data(data);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_detail(d: &RecordDraft) -> &ErrorDetail {
        match &d.detail {
            RecordDetail::Error(e) => e,
            other => panic!("not an error detail: {other:?}"),
        }
    }

    #[test]
    fn rejection_message_by_reason_shape() {
        let err = rejection(RejectionReason::Error {
            message: "boom".into(),
            stack: Some("at x".into()),
        });
        assert_eq!(err.message, "boom");
        assert_eq!(error_detail(&err).stack.as_deref(), Some("at x"));

        assert_eq!(rejection(RejectionReason::Value(json!("nope"))).message, "nope");
        assert_eq!(
            rejection(RejectionReason::Value(json!({"code": 7}))).message,
            r#"{"code":7}"#
        );
        assert_eq!(
            rejection(RejectionReason::Value(Value::Null)).message,
            UNHANDLED_REJECTION
        );
        assert_eq!(
            rejection(RejectionReason::Value(json!(42))).message,
            UNHANDLED_REJECTION
        );
    }

    #[test]
    fn resource_skips_document_root() {
        for node in ["HTML", "body", ""] {
            let event = ResourceFailure {
                node_name: node.into(),
                ..Default::default()
            };
            assert!(resource_failure(event).is_none(), "{node}");
        }
    }

    #[test]
    fn resource_prefers_src_over_href() {
        let d = resource_failure(ResourceFailure {
            node_name: "LINK".into(),
            src: None,
            href: Some("/a.css".into()),
        })
        .unwrap();
        assert_eq!(d.message, "Failed to load link: /a.css");
        assert_eq!(d.target.as_deref(), Some("/a.css"));
        assert_eq!(error_detail(&d).resource_type.as_deref(), Some("link"));
    }

    #[test]
    fn response_failure_carries_duration_and_timeout() {
        let d = http_response_failure(
            HttpFailure {
                message: "timeout of 5000ms exceeded".into(),
                started_at: Some(1_000),
                timed_out: true,
                status: None,
                ..Default::default()
            },
            6_000,
        );
        assert_eq!(d.message, "Response Error: timeout of 5000ms exceeded");
        assert_eq!(
            d.custom_data,
            Some(json!({"requestDuration": 5000, "timeout": true}))
        );
    }

    #[test]
    fn custom_type_override() {
        let d = custom("x", Some(json!({"errorType": "ajax"})), Severity::Low);
        assert_eq!(error_detail(&d).error_type, ErrorType::Ajax);
        let d = custom("x", Some(json!({"errorType": "martian"})), Severity::Low);
        assert_eq!(error_detail(&d).error_type, ErrorType::Custom);
        assert_eq!(d.level, Some(Severity::Low));
    }

    #[test]
    fn component_name_defaults() {
        let d = component_failure(ComponentFailure {
            message: "render failed".into(),
            ..Default::default()
        });
        assert_eq!(
            error_detail(&d).component_name.as_deref(),
            Some(UNKNOWN_COMPONENT)
        );
    }
}
