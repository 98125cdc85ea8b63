//! Structured log events for pipeline operations.
//!
//! Each function emits a `tracing` event with an `event` field naming it.

use lookout_core::{Record, RecordKind};

/// A record was accepted into the ring buffer.
pub fn record_collected(record: &Record) {
    tracing::debug!(
        event = "record_collected",
        kind = %record.kind(),
        category = record.category(),
        level = ?record.level,
        record_id = %record.record_id,
        message = %record.message,
        "record collected"
    );
}

/// A record matched an ignore rule and was dropped.
pub fn record_ignored(kind: RecordKind, rule: &str, message: &str) {
    tracing::debug!(
        event = "record_ignored",
        kind = %kind,
        rule = rule,
        message = %message,
        "record ignored"
    );
}

/// Sampling excluded a record from delivery.
pub fn record_sampled_out(kind: RecordKind, record_id: &str) {
    tracing::trace!(
        event = "record_sampled_out",
        kind = %kind,
        record_id = %record_id,
        "record sampled out"
    );
}

/// A record joined the batch queue.
pub fn record_queued(kind: RecordKind, queue_len: usize, batch_size: usize) {
    tracing::debug!(
        event = "record_queued",
        kind = %kind,
        queue_len = queue_len,
        batch_size = batch_size,
        "record queued"
    );
}

/// A batch was cut and handed to a transport.
pub fn batch_flushed(kind: RecordKind, trigger: &str, count: usize, url: &str) {
    tracing::info!(
        event = "batch_flushed",
        kind = %kind,
        trigger = trigger,
        count = count,
        url = %url,
        "batch flushed"
    );
}

/// A batch was sent through the unload beacon.
pub fn beacon_sent(kind: RecordKind, count: usize, url: &str, accepted: bool) {
    tracing::info!(
        event = "beacon_sent",
        kind = %kind,
        count = count,
        url = %url,
        accepted = accepted,
        "beacon sent"
    );
}

/// Records were dropped because no endpoint resolved or encoding failed.
pub fn delivery_dropped(kind: RecordKind, count: usize, reason: &str) {
    tracing::warn!(
        event = "delivery_dropped",
        kind = %kind,
        count = count,
        reason = %reason,
        "delivery dropped"
    );
}

/// A single record was handed to a transport.
pub fn record_dispatched(kind: RecordKind, record_id: &str, url: &str) {
    tracing::debug!(
        event = "record_dispatched",
        kind = %kind,
        record_id = %record_id,
        url = %url,
        "record dispatched"
    );
}

/// A session was rotated after its idle gap exceeded the timeout.
pub fn session_rotated(old_session: &str, new_session: &str, idle_ms: i64) {
    tracing::info!(
        event = "session_rotated",
        old_session = %old_session,
        new_session = %new_session,
        idle_ms = idle_ms,
        "session rotated"
    );
}

/// A runtime config patch was applied.
pub fn config_updated(kind: RecordKind) {
    tracing::info!(event = "config_updated", kind = %kind, "config updated");
}

/// A runtime config patch was rejected and the previous config kept.
pub fn config_rejected(kind: RecordKind, reason: &str) {
    tracing::warn!(
        event = "config_rejected",
        kind = %kind,
        reason = %reason,
        "config update ignored"
    );
}

/// A monitor finished setup.
pub fn monitor_started(kind: RecordKind, reporting: bool, batching: bool) {
    tracing::info!(
        event = "monitor_started",
        kind = %kind,
        reporting = reporting,
        batching = batching,
        "monitor started"
    );
}

/// A monitor or one of its sub-collectors stopped.
pub fn monitor_stopped(kind: RecordKind, part: &str) {
    tracing::info!(event = "monitor_stopped", kind = %kind, part = part, "monitor stopped");
}

/// A sub-collector could not start because the host lacks a capability.
pub fn capability_unavailable(kind: RecordKind, part: &str, capability: &str) {
    tracing::warn!(
        event = "capability_unavailable",
        kind = %kind,
        part = part,
        capability = capability,
        "capability unavailable"
    );
}

/// A sampled metric crossed its alert threshold.
pub fn vital_alert(name: &str, value: f64, rating: &str) {
    tracing::warn!(
        event = "vital_alert",
        name = name,
        value = value,
        rating = rating,
        "vital alert"
    );
}

/// The timer driver started polling.
pub fn driver_started(idle_poll_ms: u64) {
    tracing::info!(event = "driver_started", idle_poll_ms = idle_poll_ms, "driver started");
}

/// The timer driver left its loop.
pub fn driver_stopped(ticks: u64, flushed: usize) {
    tracing::info!(
        event = "driver_stopped",
        ticks = ticks,
        flushed = flushed,
        "driver stopped"
    );
}
