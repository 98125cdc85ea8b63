//! Batch delivery: the queue plus the transports it drains into.
//!
//! Delivery is at-most-once. The queue is drained before the transport sees
//! the batch, and a failed send is never re-queued.

use std::sync::Arc;

use lookout_core::config::BatchConfig;
use lookout_core::models::{BatchEnvelope, BatchQueueStatus, DeliveryRequest, Payload};
use lookout_core::traits::{IBeaconTransport, ITransport};
use lookout_core::{Record, RecordKind};

use crate::batch::{BatchQueue, FlushTrigger};
use crate::tracing_setup::events;

pub struct BatchReporter {
    kind: RecordKind,
    queue: BatchQueue<Record>,
    url: Option<String>,
    transport: Arc<dyn ITransport>,
    beacon: Arc<dyn IBeaconTransport>,
    verbose: bool,
}

impl BatchReporter {
    pub fn new(
        kind: RecordKind,
        config: &BatchConfig,
        url: Option<String>,
        transport: Arc<dyn ITransport>,
        beacon: Arc<dyn IBeaconTransport>,
    ) -> Self {
        Self {
            kind,
            queue: BatchQueue::new(config.batch_size, config.batch_interval_ms),
            url,
            transport,
            beacon,
            verbose: true,
        }
    }

    /// Toggle per-record diagnostics. Flush and failure events are always logged.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Queue a record, flushing immediately when the batch is full.
    /// Returns the number of records handed to the transport.
    pub fn enqueue(&mut self, record: Record, now: i64) -> usize {
        let trigger = self.queue.enqueue(record, now);
        if self.verbose {
            events::record_queued(self.kind, self.queue.len(), self.queue.batch_size());
        }
        match trigger {
            Some(trigger) => self.flush(trigger, now),
            None => 0,
        }
    }

    /// Fire the interval flush if its deadline has passed.
    pub fn tick(&mut self, now: i64) -> usize {
        let _span = crate::tick_span!(self.kind, now).entered();
        match self.queue.poll(now) {
            Some(trigger) => self.flush(trigger, now),
            None => 0,
        }
    }

    /// Drain the queue and dispatch its contents as one batch. An empty queue
    /// makes no transport call.
    pub fn flush(&mut self, trigger: FlushTrigger, now: i64) -> usize {
        if self.queue.is_empty() {
            return 0;
        }
        let batch = self.queue.drain();
        let count = batch.len();
        let _span = crate::flush_span!(self.kind, trigger.as_str(), count).entered();

        let Some(url) = self.url.clone() else {
            events::delivery_dropped(self.kind, count, "no batch report url");
            return 0;
        };

        events::batch_flushed(self.kind, trigger.as_str(), count, &url);
        let payload = Payload::Batch(BatchEnvelope::new(batch, now));
        self.transport.dispatch(DeliveryRequest::new(url, payload));
        count
    }

    /// Send whatever is queued through the beacon. The outcome is not
    /// observable beyond whether the host accepted the payload.
    pub fn flush_on_unload(&mut self, now: i64) -> usize {
        if self.queue.is_empty() {
            return 0;
        }
        let batch = self.queue.drain();
        let count = batch.len();
        let _span = crate::beacon_span!(self.kind, count).entered();

        let Some(url) = self.url.clone() else {
            events::delivery_dropped(self.kind, count, "no batch report url");
            return 0;
        };

        match Payload::Batch(BatchEnvelope::new(batch, now)).to_json() {
            Ok(body) => {
                let accepted = self.beacon.send_beacon(&url, body);
                events::beacon_sent(self.kind, count, &url, accepted);
                count
            }
            Err(e) => {
                events::delivery_dropped(self.kind, count, &e.to_string());
                0
            }
        }
    }

    /// Apply new settings. Anything queued under the old settings is flushed
    /// to the old destination first.
    pub fn reconfigure(&mut self, config: &BatchConfig, url: Option<String>, now: i64) {
        self.flush(FlushTrigger::Reconfigure, now);
        self.queue
            .reconfigure(config.batch_size, config.batch_interval_ms);
        self.url = url;
    }

    pub fn status(&self) -> BatchQueueStatus {
        BatchQueueStatus {
            is_enabled: true,
            queue_length: self.queue.len(),
            batch_size: self.queue.batch_size(),
            batch_interval: self.queue.interval_ms(),
            batch_report_url: self.url.clone(),
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn next_deadline(&self) -> Option<i64> {
        self.queue.deadline()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

impl std::fmt::Debug for BatchReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchReporter")
            .field("kind", &self.kind)
            .field("queue_len", &self.queue.len())
            .field("url", &self.url)
            .field("transport", &self.transport.name())
            .finish()
    }
}
