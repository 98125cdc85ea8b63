//! Spans around the pipeline's delivery work: batch flushes, unload beacons
//! and timer ticks.

/// Span for a batch flush through the async transport.
#[macro_export]
macro_rules! flush_span {
    ($kind:expr, $trigger:expr, $count:expr) => {
        tracing::debug_span!("lookout.flush", kind = %$kind, trigger = $trigger, count = $count)
    };
}

/// Span for the unload-time beacon.
#[macro_export]
macro_rules! beacon_span {
    ($kind:expr, $count:expr) => {
        tracing::debug_span!("lookout.beacon", kind = %$kind, count = $count)
    };
}

/// Span for one collector tick.
#[macro_export]
macro_rules! tick_span {
    ($kind:expr, $now:expr) => {
        tracing::trace_span!("lookout.tick", kind = %$kind, now = $now)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const FLUSH: &str = "lookout.flush";
    pub const BEACON: &str = "lookout.beacon";
    pub const TICK: &str = "lookout.tick";
}
