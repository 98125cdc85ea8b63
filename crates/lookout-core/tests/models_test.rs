use lookout_core::models::*;
use lookout_core::traits::{
    FixedRandom, HeapUsage, IClock, IEventSource, IHeapInspector, IRandom, ManualClock,
    QueuedEventSource, ScriptedHeap,
};
use serde_json::json;

fn error_record() -> Record {
    let mut detail = ErrorDetail::new(ErrorType::Javascript);
    detail.filename = Some("https://app.example/main.js".into());
    detail.lineno = Some(42);
    Record {
        record_id: "abc123".into(),
        level: Some(Severity::High),
        message: "boom".into(),
        target: None,
        timestamp: 1_700_000_000_000,
        url: "https://app.example/".into(),
        user_agent: "test-agent".into(),
        session_id: "session_1".into(),
        user_id: String::new(),
        custom_data: Some(json!({ "release": "1.2.3" })),
        detail: RecordDetail::Error(detail),
    }
}

// ── Record wire shape ──

#[test]
fn record_serializes_camel_case_with_kind_key() {
    let value = serde_json::to_value(error_record()).unwrap();
    assert_eq!(value["recordId"], "abc123");
    assert_eq!(value["userAgent"], "test-agent");
    assert_eq!(value["level"], "high");
    assert_eq!(value["error"]["type"], "javascript");
    assert_eq!(value["error"]["lineno"], 42);
    assert!(value["error"].get("stack").is_none());
    assert!(value.get("target").is_none());
}

#[test]
fn record_deserializes_back() {
    let record = error_record();
    let json = serde_json::to_string(&record).unwrap();
    let back: Record = serde_json::from_str(&json).unwrap();
    assert_eq!(back, record);
    assert_eq!(back.kind(), RecordKind::Error);
    assert_eq!(back.category(), "javascript");
    assert_eq!(back.custom_field("release"), Some(&json!("1.2.3")));
}

#[test]
fn batch_envelope_counts_records() {
    let envelope = BatchEnvelope::new(vec![error_record(), error_record()], 5);
    let value = serde_json::to_value(Payload::Batch(envelope)).unwrap();
    assert_eq!(value["batchSize"], 2);
    assert_eq!(value["batchTimestamp"], 5);
    assert_eq!(value["batch"].as_array().unwrap().len(), 2);
}

#[test]
fn single_payload_is_bare_record() {
    let payload = Payload::Record(Box::new(error_record()));
    assert_eq!(payload.len(), 1);
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["message"], "boom");
    assert!(value.get("batch").is_none());
}

#[test]
fn vital_names_use_wire_spelling() {
    assert_eq!(serde_json::to_value(VitalName::Lcp).unwrap(), "LCP");
    assert_eq!(serde_json::to_value(VitalName::LongTask).unwrap(), "LongTask");
    assert_eq!(
        serde_json::to_value(Rating::NeedsImprovement).unwrap(),
        "needs-improvement"
    );
    for name in VitalName::ALL {
        assert_eq!(serde_json::to_value(name).unwrap(), name.as_str());
    }
}

#[test]
fn error_type_parse_roundtrips_names() {
    for t in ErrorType::ALL {
        assert_eq!(ErrorType::parse(t.as_str()), Some(t));
    }
    assert_eq!(ErrorType::parse("vue"), None);
}

// ── Session ──

#[test]
fn session_touch_never_moves_backwards() {
    let mut session = Session::new("s".into(), 1_000);
    session.touch(5_000);
    session.touch(2_000);
    assert_eq!(session.last_activity_at, 5_000);
    session.touch(10);
    assert!(session.last_activity_at >= session.started_at);
    assert_eq!(session.idle_ms(6_000), 1_000);
    assert_eq!(session.duration_ms(6_000), 5_000);
}

#[test]
fn end_reasons_have_wire_names() {
    assert_eq!(EndReason::Timeout.as_str(), "timeout");
    assert_eq!(EndReason::PageUnload.as_str(), "page_unload");
}

// ── Capability doubles ──

#[test]
fn manual_clock_is_shared_between_clones() {
    let clock = ManualClock::new(100);
    let other = clock.clone();
    assert_eq!(clock.advance(50), 150);
    assert_eq!(other.now_millis(), 150);
    other.set(7);
    assert_eq!(clock.now_millis(), 7);
}

#[test]
fn fixed_random_cycles() {
    let random = FixedRandom::new(vec![0.1, 0.9]);
    assert_eq!(random.next_f64(), 0.1);
    assert_eq!(random.next_f64(), 0.9);
    assert_eq!(random.next_f64(), 0.1);
    assert_eq!(FixedRandom::constant(0.5).next_below(10), 5);
    assert_eq!(FixedRandom::constant(0.999_999_9).next_below(10), 9);
}

#[test]
fn scripted_heap_repeats_last_sample() {
    let heap = ScriptedHeap::from_used([10, 20], 100);
    assert_eq!(heap.sample().map(|u| u.used_bytes), Some(10));
    assert_eq!(heap.sample().map(|u| u.used_bytes), Some(20));
    assert_eq!(heap.sample().map(|u| u.used_bytes), Some(20));
    assert!(ScriptedHeap::default().sample().is_none());
}

#[test]
fn heap_usage_percent_handles_zero_limit() {
    let usage = HeapUsage {
        used_bytes: 50,
        total_bytes: 60,
        limit_bytes: 0,
    };
    assert_eq!(usage.usage_percent(), 0.0);
}

#[test]
fn queued_source_drains_in_order() {
    let source = QueuedEventSource::new();
    let mut consumer = source.clone();
    source.push(1);
    source.push(2);
    assert_eq!(consumer.drain(), vec![1, 2]);
    assert!(source.is_empty());
}

#[test]
fn stats_lookups_default_to_zero() {
    let stats = RecordStats {
        total: 0,
        by_type: Default::default(),
        by_level: Default::default(),
        recent: Vec::new(),
        session_duration: None,
    };
    assert_eq!(stats.count_for("javascript"), 0);
    assert_eq!(stats.count_at(Severity::Critical), 0);
}
