use lookout_core::config::{
    merge_shallow, resolve_report_url, BehaviorMonitorConfig, ErrorMonitorConfig,
    VitalsMonitorConfig,
};
use lookout_core::errors::ConfigError;
use lookout_core::{IgnorePattern, LookoutConfig, Severity};
use serde_json::json;

// ── Defaults ──

#[test]
fn error_defaults_batch_but_do_not_report() {
    let config = ErrorMonitorConfig::default();
    assert!(config.enable_console_log);
    assert!(!config.enable_report);
    assert!(config.batch.enabled);
    assert_eq!(config.batch.batch_size, 10);
    assert_eq!(config.batch.batch_interval_ms, 120_000);
    assert_eq!(config.max_errors, 100);
    assert_eq!(config.sample_rate, 1.0);
    assert_eq!(config.level_config.get("javascript"), Some(&Severity::High));
    assert_eq!(config.level_config.get("component"), Some(&Severity::High));
    assert_eq!(config.level_config.get("ajax"), Some(&Severity::Medium));
    assert_eq!(config.level_config.get("custom"), Some(&Severity::Low));
}

#[test]
fn behavior_defaults_match_source_timings() {
    let config = BehaviorMonitorConfig::default();
    assert!(!config.batch.enabled);
    assert_eq!(config.max_behaviors, 1000);
    assert_eq!(config.click.debounce_ms, 300);
    assert_eq!(config.scroll.throttle_ms, 100);
    assert!(!config.scroll.track_speed);
    assert_eq!(config.input.debounce_ms, 500);
    assert!(!config.input.track_value);
    assert_eq!(
        config.input.sensitive_fields,
        vec!["password", "pwd", "secret", "token", "key"]
    );
    assert_eq!(config.session.timeout_ms, 30 * 60 * 1000);
    assert_eq!(config.session.check_interval_ms, 60_000);
    assert_eq!(config.level_config.get("page_view"), Some(&Severity::High));
    assert_eq!(config.level_config.get("scroll"), Some(&Severity::Low));
}

#[test]
fn vitals_defaults_match_thresholds() {
    let config = VitalsMonitorConfig::default();
    assert_eq!(config.thresholds.lcp, 2500.0);
    assert_eq!(config.thresholds.cls, 0.1);
    assert_eq!(config.thresholds.inp, 200.0);
    assert_eq!(config.fps.duration_ms, 10_000);
    assert_eq!(config.long_task.max_tasks, 100);
    assert_eq!(config.memory_leak.growth_rate_threshold, 10.0);
    assert_eq!(config.memory_leak.max_monitoring_duration_ms, 300_000);
    assert!(!config.memory.enabled);
    assert_eq!(config.memory.leak_detection_window, 10);
}

// ── TOML loading ──

#[test]
fn empty_toml_yields_defaults() {
    let config = LookoutConfig::from_toml("").unwrap();
    assert_eq!(config, LookoutConfig::default());
}

#[test]
fn toml_sections_override_selected_keys() {
    let config = LookoutConfig::from_toml(
        r#"
        [error]
        enable_report = true
        report_url = "https://collector.example/errors"
        ignore_errors = ["Script error", { regex = "^ResizeObserver" }]

        [error.batch]
        batch_size = 5

        [behavior.session]
        timeout_ms = 1000

        [vitals.memory_leak]
        interval_ms = 250
        "#,
    )
    .unwrap();

    assert!(config.error.enable_report);
    assert_eq!(config.error.batch.batch_size, 5);
    assert!(config.error.batch.enabled);
    assert_eq!(config.error.batch.batch_interval_ms, 120_000);
    assert_eq!(config.error.ignore_errors.len(), 2);
    assert_eq!(config.error.ignore_errors[0], IgnorePattern::substring("Script error"));
    assert!(config.error.ignore_errors[1].matches("ResizeObserver loop limit exceeded"));
    assert_eq!(config.behavior.session.timeout_ms, 1000);
    assert!(config.behavior.session.track_session_end);
    assert_eq!(config.vitals.memory_leak.interval_ms, 250);
    assert_eq!(config.vitals.memory_leak.trend_window_size, 10);
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = LookoutConfig::from_toml("[error\nenable_report = ").unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed { .. }));
}

#[test]
fn invalid_regex_in_toml_is_rejected() {
    let err = LookoutConfig::from_toml("[error]\nignore_errors = [{ regex = \"(\" }]").unwrap_err();
    assert!(matches!(err, ConfigError::ParseFailed { .. }));
}

// ── Shallow merge ──

#[test]
fn merge_replaces_top_level_keys_only() {
    let current = ErrorMonitorConfig::default();
    let patched = merge_shallow(
        &current,
        &json!({ "sample_rate": 0.5, "batch": { "batch_size": 3 } }),
    )
    .unwrap();

    assert_eq!(patched.sample_rate, 0.5);
    assert_eq!(patched.batch.batch_size, 3);
    // The batch block was replaced wholesale, so its other keys reset to the
    // BatchConfig defaults rather than the previous values.
    assert!(patched.batch.enabled);
    assert_eq!(patched.max_errors, current.max_errors);
}

#[test]
fn merge_rejects_non_object_patch() {
    let err = merge_shallow(&ErrorMonitorConfig::default(), &json!([1, 2])).unwrap_err();
    assert!(matches!(err, ConfigError::PatchNotAnObject { ref found } if found == "array"));
}

#[test]
fn merge_rejects_ill_typed_value() {
    let err =
        merge_shallow(&ErrorMonitorConfig::default(), &json!({ "max_errors": "many" })).unwrap_err();
    assert!(matches!(err, ConfigError::PatchRejected { .. }));
}

#[test]
fn merge_ignores_unknown_keys() {
    let current = BehaviorMonitorConfig::default();
    let patched = merge_shallow(&current, &json!({ "no_such_key": true })).unwrap();
    assert_eq!(patched, current);
}

// ── URL resolution ──

#[test]
fn configured_url_wins() {
    let url = resolve_report_url(
        Some("https://a.example"),
        "LOOKOUT_TEST_UNSET_URL_VAR_A",
        Some("https://builtin.example"),
    );
    assert_eq!(url.as_deref(), Some("https://a.example"));
}

#[test]
fn blank_url_falls_through_to_builtin() {
    let url = resolve_report_url(
        Some("   "),
        "LOOKOUT_TEST_UNSET_URL_VAR_B",
        Some("https://builtin.example"),
    );
    assert_eq!(url.as_deref(), Some("https://builtin.example"));
}

#[test]
fn env_url_beats_builtin() {
    std::env::set_var("LOOKOUT_TEST_URL_VAR_C", "https://env.example");
    let url = resolve_report_url(None, "LOOKOUT_TEST_URL_VAR_C", Some("https://builtin.example"));
    assert_eq!(url.as_deref(), Some("https://env.example"));
}

#[test]
fn behavior_has_no_builtin_url() {
    let url = resolve_report_url(None, "LOOKOUT_TEST_UNSET_URL_VAR_D", None);
    assert!(url.is_none());
}

#[test]
fn batch_url_falls_back_to_report_url() {
    let mut config = ErrorMonitorConfig {
        report_url: Some("https://collector.example/errors".into()),
        ..Default::default()
    };
    assert_eq!(
        config.resolved_batch_url().as_deref(),
        Some("https://collector.example/errors")
    );
    config.batch.batch_report_url = Some("https://collector.example/batch".into());
    assert_eq!(
        config.resolved_batch_url().as_deref(),
        Some("https://collector.example/batch")
    );
}

#[test]
fn policy_projection_carries_ignore_lists() {
    let config = BehaviorMonitorConfig {
        ignore_behaviors: vec!["scroll".into()],
        ignore_elements: vec!["button#secret".into()],
        max_behaviors: 7,
        ..Default::default()
    };
    let policy = config.policy();
    assert_eq!(policy.ignore_messages, vec![IgnorePattern::substring("scroll")]);
    assert_eq!(
        policy.ignore_targets,
        vec![
            IgnorePattern::substring("scroll"),
            IgnorePattern::substring("button#secret")
        ]
    );
    assert!(policy.ignore_urls.is_empty());
    assert_eq!(policy.max_records, 7);
}
