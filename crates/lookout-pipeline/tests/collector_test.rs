//! Collector pipeline: filter → buffer → queue → transport.

use std::sync::{Arc, Mutex};

use lookout_core::config::{BatchConfig, PolicyConfig};
use lookout_core::models::{ErrorDetail, ErrorType, Payload, Record, RecordDetail};
use lookout_core::traits::{FixedRandom, IClock, ManualClock, StaticPageContext};
use lookout_core::{IgnorePattern, RecordKind, Severity};
use lookout_pipeline::{CollectOutcome, Collector, CollectorEnv, CollectorSettings, RecordDraft};
use lookout_transport::{RecordingBeacon, RecordingTransport};

const BATCH_URL: &str = "https://collect.test/errors-batch";
const SINGLE_URL: &str = "https://collect.test/errors";

// ─── Helpers ───────────────────────────────────────────────

struct Harness {
    clock: ManualClock,
    transport: RecordingTransport,
    beacon: RecordingBeacon,
    env: CollectorEnv,
}

fn harness(random: f64) -> Harness {
    let clock = ManualClock::new(1_700_000_000_000);
    let transport = RecordingTransport::new();
    let beacon = RecordingBeacon::new();
    let env = CollectorEnv::new(
        Arc::new(clock.clone()),
        Arc::new(StaticPageContext::new("https://app.test/orders", "test-agent")),
        Arc::new(FixedRandom::constant(random)),
        Arc::new(transport.clone()),
        Arc::new(beacon.clone()),
    );
    Harness {
        clock,
        transport,
        beacon,
        env,
    }
}

fn batched_settings(size: usize, interval_ms: u64) -> CollectorSettings {
    let mut settings = CollectorSettings::new(RecordKind::Error);
    settings.enable_report = true;
    settings.report_url = Some(SINGLE_URL.into());
    settings.batch = BatchConfig {
        enabled: true,
        batch_size: size,
        batch_interval_ms: interval_ms,
        batch_report_url: Some(BATCH_URL.into()),
    };
    settings.batch_report_url = Some(BATCH_URL.into());
    settings.categories = ErrorType::ALL.iter().map(|t| t.as_str()).collect();
    settings
}

fn draft(message: &str) -> RecordDraft {
    RecordDraft::new(
        message,
        RecordDetail::Error(ErrorDetail::new(ErrorType::Custom)),
    )
}

fn messages(payload: &Payload) -> Vec<String> {
    payload
        .records()
        .into_iter()
        .map(|r| r.message.clone())
        .collect()
}

// ─── Batch queue ───────────────────────────────────────────

#[test]
fn nine_records_wait_and_tenth_flushes_all_in_order() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(10, 120_000), h.env.clone());

    for i in 0..9 {
        assert_eq!(collector.collect(draft(&format!("e{i}"))), CollectOutcome::Queued);
    }
    assert_eq!(h.transport.call_count(), 0);
    assert_eq!(collector.batch_status().queue_length, 9);

    assert_eq!(
        collector.collect(draft("e9")),
        CollectOutcome::BatchFlushed { count: 10 }
    );
    let requests = h.transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, BATCH_URL);
    let expected: Vec<String> = (0..10).map(|i| format!("e{i}")).collect();
    assert_eq!(messages(&requests[0].payload), expected);
    assert_eq!(collector.batch_status().queue_length, 0);
    assert_eq!(collector.next_deadline(), None);
}

#[test]
fn queue_is_empty_as_soon_as_flush_starts() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(10, 120_000), h.env.clone());
    collector.collect(draft("first"));
    collector.collect(draft("second"));

    assert_eq!(collector.flush(), 2);
    assert_eq!(collector.batch_status().queue_length, 0);

    collector.collect(draft("third"));
    let flushed = h.transport.requests();
    assert_eq!(flushed.len(), 1);
    assert_eq!(messages(&flushed[0].payload), vec!["first", "second"]);
    assert_eq!(collector.batch_status().queue_length, 1);
}

#[test]
fn flush_on_empty_queue_makes_no_call() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(10, 120_000), h.env.clone());
    assert_eq!(collector.flush(), 0);
    assert_eq!(collector.on_hidden(), 0);
    assert_eq!(collector.on_unload(), 0);
    assert_eq!(h.transport.call_count(), 0);
    assert_eq!(h.beacon.call_count(), 0);
}

#[test]
fn interval_flush_fires_on_tick_after_deadline() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(10, 120_000), h.env.clone());
    collector.collect(draft("late"));
    let deadline = h.clock.now_millis() + 120_000;
    assert_eq!(collector.next_deadline(), Some(deadline));

    h.clock.advance(119_999);
    assert_eq!(collector.tick(), 0);
    h.clock.advance(1);
    assert_eq!(collector.tick(), 1);
    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(collector.next_deadline(), None);
}

#[test]
fn timer_is_armed_once_per_queue_cycle() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(10, 1_000), h.env.clone());
    let start = h.clock.now_millis();
    collector.collect(draft("a"));
    h.clock.advance(500);
    collector.collect(draft("b"));
    assert_eq!(collector.next_deadline(), Some(start + 1_000));
}

#[test]
fn collect_at_stamps_record_but_arms_timer_from_now() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(10, 120_000), h.env.clone());
    let observed = h.clock.now_millis();
    h.clock.advance(5_000);

    assert_eq!(collector.collect_at(draft("late"), observed), CollectOutcome::Queued);
    assert_eq!(collector.records()[0].timestamp, observed);
    assert_eq!(collector.batch_status().queue_length, 1);
    assert_eq!(collector.next_deadline(), Some(observed + 125_000));
}

#[test]
fn hidden_page_flushes_through_transport() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(10, 120_000), h.env.clone());
    collector.collect(draft("a"));
    assert_eq!(collector.on_hidden(), 1);
    assert_eq!(h.transport.call_count(), 1);
    assert_eq!(h.beacon.call_count(), 0);
}

#[test]
fn unload_hands_queue_to_beacon() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(10, 120_000), h.env.clone());
    collector.collect(draft("a"));
    collector.collect(draft("b"));

    assert_eq!(collector.on_unload(), 2);
    assert_eq!(h.transport.call_count(), 0);
    let calls = h.beacon.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url, BATCH_URL);
    let envelope = calls[0].batch().unwrap();
    assert_eq!(envelope.batch_size, 2);
    assert_eq!(envelope.batch_timestamp, h.clock.now_millis());
    assert_eq!(collector.batch_status().queue_length, 0);
}

#[test]
fn disabling_batch_flushes_pending_records() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(10, 120_000), h.env.clone());
    collector.collect(draft("pending"));

    let mut settings = batched_settings(10, 120_000);
    settings.batch.enabled = false;
    collector.reconfigure(settings);

    assert_eq!(h.transport.call_count(), 1);
    assert!(!collector.batch_status().is_enabled);
    assert_eq!(collector.collect(draft("now-single")), CollectOutcome::Delivered);
    assert_eq!(h.transport.requests()[1].url, SINGLE_URL);
}

// ─── Sampling & ignore rules ───────────────────────────────

#[test]
fn sample_rate_zero_never_enqueues() {
    let h = harness(0.0);
    let mut settings = batched_settings(10, 120_000);
    settings.policy.sample_rate = 0.0;
    let mut collector = Collector::new(settings, h.env.clone());

    for i in 0..25 {
        assert_eq!(collector.collect(draft(&format!("e{i}"))), CollectOutcome::SampledOut);
    }
    assert_eq!(collector.len(), 25);
    assert_eq!(collector.batch_status().queue_length, 0);
    assert_eq!(collector.flush(), 0);
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn sample_rate_one_always_enqueues() {
    let h = harness(0.999);
    let mut settings = batched_settings(100, 120_000);
    settings.policy.sample_rate = 1.0;
    let mut collector = Collector::new(settings, h.env.clone());

    for i in 0..25 {
        assert_eq!(collector.collect(draft(&format!("e{i}"))), CollectOutcome::Queued);
    }
    assert_eq!(collector.batch_status().queue_length, 25);
}

#[test]
fn ignored_message_is_absent_everywhere() {
    let h = harness(0.5);
    let mut settings = batched_settings(10, 120_000);
    settings.policy = PolicyConfig {
        ignore_messages: vec![IgnorePattern::substring("Script error")],
        max_records: 100,
        ..PolicyConfig::default()
    };
    let mut collector = Collector::new(settings, h.env.clone());

    assert_eq!(collector.collect(draft("Script error.")), CollectOutcome::Ignored);
    assert!(collector.is_empty());
    assert_eq!(collector.batch_status().queue_length, 0);
    assert_eq!(collector.stats().total, 0);

    assert_eq!(collector.collect(draft("TypeError: x")), CollectOutcome::Queued);
    assert_eq!(collector.len(), 1);
}

#[test]
fn ignored_page_url_is_dropped() {
    let h = harness(0.5);
    let mut settings = batched_settings(10, 120_000);
    settings.policy.ignore_urls = vec![IgnorePattern::regex(r"/orders$").unwrap()];
    let mut collector = Collector::new(settings, h.env.clone());
    assert_eq!(collector.collect(draft("boom")), CollectOutcome::Ignored);
}

// ─── Single-record delivery ────────────────────────────────

#[test]
fn unbatched_record_is_posted_alone() {
    let h = harness(0.5);
    let mut settings = batched_settings(10, 120_000);
    settings.batch = BatchConfig::disabled();
    settings.custom_data = Some(serde_json::json!({"build": "abc"}));
    let mut collector = Collector::new(settings, h.env.clone());

    assert_eq!(collector.collect(draft("boom")), CollectOutcome::Delivered);
    let requests = h.transport.requests();
    assert_eq!(requests[0].url, SINGLE_URL);
    match &requests[0].payload {
        Payload::Record(record) => {
            assert_eq!(record.message, "boom");
            assert_eq!(record.url, "https://app.test/orders");
            assert_eq!(record.user_agent, "test-agent");
            assert_eq!(record.custom_field("build"), Some(&serde_json::json!("abc")));
        }
        other => panic!("expected single record, got {other:?}"),
    }
}

#[test]
fn missing_endpoint_disables_reporting() {
    let h = harness(0.5);
    let mut settings = batched_settings(10, 120_000);
    settings.batch = BatchConfig::disabled();
    settings.report_url = None;
    let mut collector = Collector::new(settings, h.env.clone());

    assert_eq!(collector.collect(draft("boom")), CollectOutcome::NoEndpoint);
    assert_eq!(collector.len(), 1);
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn report_disabled_retains_without_network() {
    let h = harness(0.5);
    let mut settings = batched_settings(10, 120_000);
    settings.enable_report = false;
    let mut collector = Collector::new(settings, h.env.clone());

    assert_eq!(collector.collect(draft("boom")), CollectOutcome::Retained);
    assert_eq!(collector.stats().total, 1);
    assert_eq!(collector.flush(), 0);
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn custom_reporter_replaces_builtin_delivery() {
    let h = harness(0.5);
    let mut collector = Collector::new(batched_settings(1, 120_000), h.env.clone());
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let sink = Arc::clone(&seen);
    collector.set_custom_reporter(Some(Arc::new(move |r: &Record| {
        sink.lock().unwrap().push(r.message.clone());
    })));

    assert_eq!(collector.collect(draft("hooked")), CollectOutcome::CustomReported);
    assert_eq!(seen.lock().unwrap().as_slice(), ["hooked"]);
    assert_eq!(h.transport.call_count(), 0);
}

// ─── Introspection ─────────────────────────────────────────

#[test]
fn stats_seed_every_category_and_assign_default_level() {
    let h = harness(0.5);
    let mut settings = batched_settings(10, 120_000);
    settings.enable_report = false;
    settings
        .policy
        .level_defaults
        .insert("custom".into(), Severity::Low);
    let mut collector = Collector::new(settings, h.env.clone());

    collector.collect(draft("a"));
    collector.collect(draft("b").with_level(Severity::High));
    let stats = collector.stats();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.count_for("custom"), 2);
    assert_eq!(stats.count_for("javascript"), 0);
    assert!(stats.by_type.contains_key("ajax"));
    assert_eq!(stats.count_at(Severity::Low), 1);
    assert_eq!(stats.count_at(Severity::High), 1);
    assert_eq!(stats.recent.len(), 2);

    collector.clear();
    assert_eq!(collector.stats().total, 0);
}

#[test]
fn records_snapshot_is_a_copy() {
    let h = harness(0.5);
    let mut settings = batched_settings(10, 120_000);
    settings.enable_report = false;
    let mut collector = Collector::new(settings, h.env.clone());
    collector.collect(draft("a"));

    let mut snapshot = collector.records();
    snapshot.clear();
    assert_eq!(collector.len(), 1);
}
