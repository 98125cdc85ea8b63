//! Behavior events → [`RecordDraft`]s.

use serde_json::{json, Map, Value};

use lookout_core::config::{ClickConfig, InputConfig, ScrollConfig};
use lookout_core::constants::MAX_ELEMENT_TEXT_CHARS;
use lookout_core::models::{BehaviorDetail, BehaviorType, EndReason, RecordDetail};
use lookout_core::traits::IPageContext;
use lookout_core::Severity;
use lookout_pipeline::RecordDraft;

use crate::events::{
    ClickEvent, ElementInfo, FocusEvent, InputEvent, NavigationEvent, ResizeEvent, ScrollEvent,
};

fn draft(detail: BehaviorDetail) -> RecordDraft {
    RecordDraft::new(detail.behavior_type.as_str(), RecordDetail::Behavior(detail))
}

fn non_empty(s: &Option<String>) -> Option<String> {
    s.clone().filter(|v| !v.is_empty())
}

fn element_fields(detail: &mut BehaviorDetail, element: &ElementInfo) {
    let tag = element.tag();
    if !tag.is_empty() {
        detail.element_tag = Some(tag);
    }
    detail.element_id = non_empty(&element.id);
    detail.element_class = non_empty(&element.class_name);
}

pub fn click(event: &ClickEvent, config: &ClickConfig) -> RecordDraft {
    let mut detail = BehaviorDetail::new(BehaviorType::Click);
    detail.x = Some(event.client_x);
    detail.y = Some(event.client_y);
    element_fields(&mut detail, &event.element);
    detail.element_href = non_empty(&event.element.href);
    detail.element_src = non_empty(&event.element.src);

    if config.track_text {
        detail.element_text = event
            .element
            .text
            .as_deref()
            .map(|t| t.trim().chars().take(MAX_ELEMENT_TEXT_CHARS).collect());
    }
    if config.track_position {
        if let Some(rect) = event.element.rect {
            detail.width = Some(rect.width);
            detail.height = Some(rect.height);
        }
        detail.scroll_x = Some(event.scroll_x);
        detail.scroll_y = Some(event.scroll_y);
    }
    draft(detail).with_target(event.element.tag())
}

/// Scroll position from the previous throttled sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMark {
    pub scroll_y: f64,
    pub at: i64,
}

pub fn scroll(
    event: &ScrollEvent,
    previous: ScrollMark,
    now: i64,
    config: &ScrollConfig,
) -> RecordDraft {
    let mut detail = BehaviorDetail::new(BehaviorType::Scroll);
    detail.scroll_x = Some(event.scroll_x);
    detail.scroll_y = Some(event.scroll_y);

    let delta = event.scroll_y - previous.scroll_y;
    let mut data = Map::new();
    if config.track_direction {
        let direction = if delta > 0.0 { "down" } else { "up" };
        data.insert("direction".into(), json!(direction));
        data.insert("deltaY".into(), json!(delta));
    }
    if config.track_speed {
        let elapsed = (now - previous.at) as f64;
        let speed = if elapsed > 0.0 { delta.abs() / elapsed } else { 0.0 };
        data.insert("speed".into(), json!(speed));
    }

    let mut out = draft(detail).with_target("window");
    if !data.is_empty() {
        out = out.with_custom_data(Value::Object(data));
    }
    out
}

/// Case-insensitive substring match against the sensitive field list.
pub fn is_sensitive(field_name: &str, sensitive_fields: &[String]) -> bool {
    let field = field_name.to_lowercase();
    sensitive_fields
        .iter()
        .any(|s| !s.is_empty() && field.contains(&s.to_lowercase()))
}

pub fn input(event: &InputEvent, config: &InputConfig) -> RecordDraft {
    let field_name = event.field_name();
    let mut detail = BehaviorDetail::new(BehaviorType::Input);
    element_fields(&mut detail, &event.element);
    if config.track_value && !is_sensitive(&field_name, &config.sensitive_fields) {
        detail.value = Some(Value::String(event.value.clone()));
    }
    draft(detail).with_target(field_name)
}

pub fn focus(event: &FocusEvent, blur: bool) -> RecordDraft {
    let behavior_type = if blur {
        BehaviorType::Blur
    } else {
        BehaviorType::Focus
    };
    let mut detail = BehaviorDetail::new(behavior_type);
    element_fields(&mut detail, &event.element);
    draft(detail).with_target(event.element.tag())
}

pub fn resize(event: &ResizeEvent) -> RecordDraft {
    let mut detail = BehaviorDetail::new(BehaviorType::Resize);
    detail.width = Some(event.width);
    detail.height = Some(event.height);
    draft(detail).with_target("window")
}

pub fn navigation(event: &NavigationEvent) -> RecordDraft {
    let mut detail = BehaviorDetail::new(BehaviorType::Navigation);
    detail.route = Some(event.to.clone());
    detail.previous_route = event.from.clone();
    draft(detail).with_target(event.to.clone())
}

pub fn page_view(page: &dyn IPageContext) -> RecordDraft {
    let mut detail = BehaviorDetail::new(BehaviorType::PageView);
    detail.page_title = page.title();
    detail.referrer = page.referrer();
    if let Some((width, height)) = page.viewport() {
        detail.viewport_width = Some(width);
        detail.viewport_height = Some(height);
    }
    draft(detail).with_target("document")
}

pub fn session_start() -> RecordDraft {
    draft(BehaviorDetail::new(BehaviorType::SessionStart))
}

pub fn session_end(duration_ms: i64, reason: EndReason) -> RecordDraft {
    draft(BehaviorDetail::new(BehaviorType::SessionEnd)).with_custom_data(json!({
        "sessionDuration": duration_ms,
        "reason": reason.as_str(),
    }))
}

pub fn custom(action: &str, custom_data: Option<Value>, level: Severity) -> RecordDraft {
    let mut out = RecordDraft::new(
        action,
        RecordDetail::Behavior(BehaviorDetail::new(BehaviorType::Custom)),
    )
    .with_level(level);
    if let Some(data) = custom_data {
        out = out.with_custom_data(data);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn behavior(d: &RecordDraft) -> &BehaviorDetail {
        match &d.detail {
            RecordDetail::Behavior(b) => b,
            other => panic!("not a behavior detail: {other:?}"),
        }
    }

    #[test]
    fn click_text_is_trimmed_and_capped() {
        let long = format!("  {}  ", "x".repeat(150));
        let event = ClickEvent {
            element: ElementInfo::new("BUTTON").with_id("buy").with_text(long),
            client_x: 10.0,
            client_y: 20.0,
            ..Default::default()
        };
        let d = click(&event, &ClickConfig::default());
        assert_eq!(d.message, "click");
        assert_eq!(d.target.as_deref(), Some("button"));
        let b = behavior(&d);
        assert_eq!(b.element_text.as_ref().map(|t| t.len()), Some(100));
        assert_eq!(b.element_id.as_deref(), Some("buy"));
        assert_eq!(b.element_class, None);
    }

    #[test]
    fn click_without_position_tracking() {
        let config = ClickConfig {
            track_position: false,
            track_text: false,
            ..ClickConfig::default()
        };
        let event = ClickEvent {
            element: ElementInfo::new("A").with_href("/help").with_rect(50.0, 10.0),
            ..Default::default()
        };
        let b = behavior(&click(&event, &config)).clone();
        assert_eq!(b.width, None);
        assert_eq!(b.scroll_y, None);
        assert_eq!(b.element_text, None);
        assert_eq!(b.element_href.as_deref(), Some("/help"));
    }

    #[test]
    fn scroll_direction_and_speed() {
        let config = ScrollConfig {
            track_speed: true,
            ..ScrollConfig::default()
        };
        let d = scroll(
            &ScrollEvent {
                scroll_x: 0.0,
                scroll_y: 300.0,
            },
            ScrollMark {
                scroll_y: 100.0,
                at: 0,
            },
            100,
            &config,
        );
        assert_eq!(
            d.custom_data,
            Some(json!({"direction": "down", "deltaY": 200.0, "speed": 2.0}))
        );
    }

    #[test]
    fn sensitive_fields_match_case_insensitively() {
        let fields = vec!["password".to_string(), "token".to_string()];
        assert!(is_sensitive("userPassword", &fields));
        assert!(is_sensitive("API_TOKEN", &fields));
        assert!(!is_sensitive("email", &fields));
    }

    #[test]
    fn input_value_respects_tracking_and_sensitivity() {
        let config = InputConfig {
            track_value: true,
            ..InputConfig::default()
        };
        let email = InputEvent {
            element: ElementInfo::new("INPUT").with_name("email"),
            value: "a@b.test".into(),
        };
        let pwd = InputEvent {
            element: ElementInfo::new("INPUT").with_name("pwd"),
            value: "hunter2".into(),
        };
        assert_eq!(behavior(&input(&email, &config)).value, Some(json!("a@b.test")));
        assert_eq!(behavior(&input(&pwd, &config)).value, None);
        assert_eq!(
            behavior(&input(&email, &InputConfig::default())).value,
            None
        );
    }

    #[test]
    fn session_end_payload() {
        let d = session_end(90_000, EndReason::Timeout);
        assert_eq!(d.message, "session_end");
        assert_eq!(
            d.custom_data,
            Some(json!({"sessionDuration": 90000, "reason": "timeout"}))
        );
    }
}
