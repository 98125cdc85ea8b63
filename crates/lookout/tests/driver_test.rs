//! The tokio driver ticking monitors on their deadlines.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};

use lookout::driver::spawn_driver;
use lookout::{EnvBuilder, Lookout};
use lookout_core::traits::{FixedRandom, ManualClock, StaticPageContext};
use lookout_transport::RecordingTransport;

const T0: i64 = 1_700_000_000_000;

const REPORTING: &str = r#"
[error]
enable_report = true
report_url = "https://collect.test/errors"

[vitals.fps]
enabled = false
"#;

fn lookout(clock: &ManualClock, transport: &RecordingTransport) -> Lookout {
    let env = EnvBuilder::new(Arc::new(StaticPageContext::new(
        "https://app.test/home",
        "test-agent",
    )))
    .clock(Arc::new(clock.clone()))
    .random(Arc::new(FixedRandom::constant(0.5)))
    .transport(Arc::new(transport.clone()))
    .build();
    Lookout::from_toml(REPORTING, env).unwrap()
}

#[tokio::test(start_paused = true)]
async fn due_batch_is_flushed_then_driver_stops() {
    let clock = ManualClock::new(T0);
    let transport = RecordingTransport::new();
    let mut handle = lookout(&clock, &transport);
    handle.errors_mut().report_custom("boom", None, None);
    clock.set(T0 + 120_000);

    let shared = Arc::new(Mutex::new(handle));
    let (stop, shutdown) = watch::channel(false);
    let task = spawn_driver(shared.clone(), shutdown);

    tokio::time::sleep(Duration::from_millis(10)).await;
    stop.send(true).unwrap();
    task.await.unwrap();

    assert_eq!(transport.call_count(), 1);
    assert_eq!(shared.lock().await.errors().batch_status().queue_length, 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_sender_stops_the_driver() {
    let clock = ManualClock::new(T0);
    let transport = RecordingTransport::new();
    let shared = Arc::new(Mutex::new(lookout(&clock, &transport)));
    let (stop, shutdown) = watch::channel(false);
    let task = spawn_driver(shared, shutdown);

    drop(stop);
    task.await.unwrap();
    assert_eq!(transport.call_count(), 0);
}
