//! The facade fanning lifecycle events out to all three monitors.

use std::sync::Arc;

use lookout::{CollectOutcome, EnvBuilder, Lookout, LookoutError, LookoutOptions};
use lookout_core::models::VitalName;
use lookout_core::traits::{FixedRandom, ManualClock, StaticPageContext};
use lookout_pipeline::CollectorEnv;
use lookout_transport::{RecordingBeacon, RecordingTransport};

const T0: i64 = 1_700_000_000_000;

const REPORTING: &str = r#"
[error]
enable_report = true
report_url = "https://collect.test/errors"

[error.batch]
enabled = true
batch_size = 5

[behavior]
enable_report = true
report_url = "https://collect.test/behavior"

[behavior.batch]
enabled = true

[behavior.page]
track_page_view = false

[vitals]
enable_report = true
report_url = "https://collect.test/vitals"

[vitals.batch]
enabled = true

[vitals.fps]
enabled = false

[vitals.long_task]
enabled = false

[vitals.memory_leak]
enabled = false

[vitals.memory]
enabled = false
"#;

// ─── Helpers ───────────────────────────────────────────────

struct Harness {
    clock: ManualClock,
    transport: RecordingTransport,
    beacon: RecordingBeacon,
    env: CollectorEnv,
}

fn harness() -> Harness {
    let clock = ManualClock::new(T0);
    let transport = RecordingTransport::new();
    let beacon = RecordingBeacon::new();
    let env = EnvBuilder::new(Arc::new(StaticPageContext::new(
        "https://app.test/home",
        "test-agent",
    )))
    .clock(Arc::new(clock.clone()))
    .random(Arc::new(FixedRandom::constant(0.5)))
    .transport(Arc::new(transport.clone()))
    .beacon(Arc::new(beacon.clone()))
    .build();
    Harness {
        clock,
        transport,
        beacon,
        env,
    }
}

fn reporting(h: &Harness) -> Lookout {
    Lookout::from_toml(REPORTING, h.env.clone()).unwrap()
}

fn record_one_each(lookout: &mut Lookout) {
    assert_eq!(
        lookout.errors_mut().report_custom("checkout failed", None, None),
        CollectOutcome::Queued
    );
    assert_eq!(
        lookout
            .vitals_mut()
            .report_custom(VitalName::Lcp, 1_200.0, None, None),
        CollectOutcome::Queued
    );
}

// ─── Construction ──────────────────────────────────────────

#[test]
fn toml_sections_reach_each_monitor() {
    let h = harness();
    let lookout = reporting(&h);
    assert_eq!(lookout.errors().config().batch.batch_size, 5);
    assert!(lookout.behavior().config().batch.enabled);
    assert!(!lookout.vitals().config().fps.enabled);
}

#[test]
fn default_options_use_default_config() {
    let h = harness();
    let lookout = Lookout::with_options(LookoutOptions::default(), h.env).unwrap();
    assert!(!lookout.errors().config().enable_report);
    assert!(!lookout.behavior().config().enable_report);
}

#[test]
fn malformed_toml_is_a_config_error() {
    let h = harness();
    let err = Lookout::from_toml("[error\nenable_report = ", h.env).unwrap_err();
    assert!(matches!(err, LookoutError::Config(_)));
}

#[test]
fn monitors_share_the_clock() {
    let h = harness();
    let lookout = reporting(&h);
    h.clock.advance(250);
    assert_eq!(lookout.now(), T0 + 250);
}

// ─── Lifecycle fan-out ─────────────────────────────────────

#[test]
fn unload_beacons_every_queue() {
    let h = harness();
    let mut lookout = reporting(&h);
    record_one_each(&mut lookout);

    // error + session_start/session_end + LCP
    assert_eq!(lookout.on_page_unload(), 4);

    let calls = h.beacon.calls();
    assert_eq!(calls.len(), 3);
    let sizes: Vec<usize> = calls
        .iter()
        .map(|c| c.batch().map_or(0, |b| b.batch_size))
        .collect();
    assert_eq!(sizes, vec![1, 2, 1]);
    assert_eq!(h.transport.call_count(), 0);
}

#[test]
fn hidden_flushes_through_the_transport() {
    let h = harness();
    let mut lookout = reporting(&h);
    record_one_each(&mut lookout);

    assert_eq!(lookout.on_visibility_hidden(), 3);
    assert_eq!(h.transport.call_count(), 3);
    assert_eq!(h.beacon.call_count(), 0);
    assert_eq!(lookout.flush_all(), 0);
}

#[test]
fn next_deadline_is_the_earliest() {
    let h = harness();
    let lookout = reporting(&h);
    let expected = [
        lookout.errors().next_deadline(),
        lookout.behavior().next_deadline(),
        lookout.vitals().next_deadline(),
    ]
    .into_iter()
    .flatten()
    .min();
    assert!(expected.is_some());
    assert_eq!(lookout.next_deadline(), expected);
}

#[test]
fn tick_sends_due_batches() {
    let h = harness();
    let mut lookout = reporting(&h);
    record_one_each(&mut lookout);

    h.clock.set(T0 + 120_000);
    assert_eq!(lookout.tick(), 3);
    assert_eq!(h.transport.call_count(), 3);
}

#[test]
fn stats_cover_each_monitor_then_clear() {
    let h = harness();
    let mut lookout = reporting(&h);
    record_one_each(&mut lookout);

    let stats = lookout.stats();
    assert_eq!(stats.error.total, 1);
    assert_eq!(stats.behavior.total, 1);
    assert_eq!(stats.vitals.total, 1);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["error"]["total"], 1);

    lookout.clear();
    let stats = lookout.stats();
    assert_eq!(stats.error.total + stats.behavior.total + stats.vitals.total, 0);
}
