//! Tokio task that calls [`Lookout::tick`] whenever a deadline comes due.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use lookout_pipeline::tracing_setup::events;

use crate::runtime::Lookout;

/// Longest sleep between polls. Events fed in between can arm earlier
/// deadlines than the one the driver is waiting on.
pub const IDLE_POLL: Duration = Duration::from_secs(1);

/// Run the timer loop until `shutdown` flips to true or its sender drops.
pub fn spawn_driver(
    lookout: Arc<Mutex<Lookout>>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(run(lookout, shutdown))
}

async fn run(lookout: Arc<Mutex<Lookout>>, mut shutdown: watch::Receiver<bool>) {
    events::driver_started(IDLE_POLL.as_millis() as u64);
    let mut ticks = 0u64;
    let mut flushed = 0usize;

    loop {
        if *shutdown.borrow() {
            break;
        }
        let wait = {
            let guard = lookout.lock().await;
            wait_for(guard.next_deadline(), guard.now())
        };
        tokio::select! {
            _ = tokio::time::sleep(wait) => {
                flushed += lookout.lock().await.tick();
                ticks += 1;
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    events::driver_stopped(ticks, flushed);
}

fn wait_for(deadline: Option<i64>, now: i64) -> Duration {
    match deadline {
        Some(at) => Duration::from_millis(at.saturating_sub(now).max(0) as u64).min(IDLE_POLL),
        None => IDLE_POLL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_is_capped_and_never_negative() {
        assert_eq!(wait_for(None, 0), IDLE_POLL);
        assert_eq!(wait_for(Some(100), 0), Duration::from_millis(100));
        assert_eq!(wait_for(Some(0), 100), Duration::ZERO);
        assert_eq!(wait_for(Some(60_000), 0), IDLE_POLL);
    }
}
