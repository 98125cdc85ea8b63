//! The collector pipeline shared by all three monitors.

use std::sync::Arc;

use serde_json::Value;

use lookout_core::config::{BatchConfig, PolicyConfig};
use lookout_core::models::{BatchQueueStatus, DeliveryRequest, Payload, RecordStats};
use lookout_core::traits::{
    IBeaconTransport, IClock, ICustomReporter, IHeapInspector, IPageContext, IRandom, ITransport,
};
use lookout_core::{Record, RecordKind};

use crate::batch::FlushTrigger;
use crate::delivery::BatchReporter;
use crate::normalizer::{Normalizer, RecordDraft};
use crate::policy::{Decision, PolicyFilter};
use crate::ring_buffer::RingBuffer;
use crate::session::{SessionTracker, TimeoutPolicy};
use crate::stats::compute_stats;
use crate::tracing_setup::events;

/// Host capabilities a collector runs against.
#[derive(Clone)]
pub struct CollectorEnv {
    pub clock: Arc<dyn IClock>,
    pub page: Arc<dyn IPageContext>,
    pub random: Arc<dyn IRandom>,
    pub transport: Arc<dyn ITransport>,
    pub beacon: Arc<dyn IBeaconTransport>,
    /// Only the vitals collector reads the heap.
    pub heap: Option<Arc<dyn IHeapInspector>>,
}

impl CollectorEnv {
    pub fn new(
        clock: Arc<dyn IClock>,
        page: Arc<dyn IPageContext>,
        random: Arc<dyn IRandom>,
        transport: Arc<dyn ITransport>,
        beacon: Arc<dyn IBeaconTransport>,
    ) -> Self {
        Self {
            clock,
            page,
            random,
            transport,
            beacon,
            heap: None,
        }
    }

    pub fn with_heap(mut self, heap: Arc<dyn IHeapInspector>) -> Self {
        self.heap = Some(heap);
        self
    }

    pub fn now(&self) -> i64 {
        self.clock.now_millis()
    }
}

impl std::fmt::Debug for CollectorEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectorEnv")
            .field("transport", &self.transport.name())
            .field("heap", &self.heap.is_some())
            .finish_non_exhaustive()
    }
}

/// Resolved settings for one collector, projected from a monitor config.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub kind: RecordKind,
    pub enable_console_log: bool,
    pub enable_report: bool,
    /// Resolved single-record endpoint.
    pub report_url: Option<String>,
    pub batch: BatchConfig,
    /// Resolved batch endpoint.
    pub batch_report_url: Option<String>,
    pub policy: PolicyConfig,
    pub user_id: Option<String>,
    pub session_seed: Option<String>,
    pub custom_data: Option<Value>,
    pub session_timeout: Option<TimeoutPolicy>,
    /// How many records `stats().recent` carries.
    pub recent_k: usize,
    /// Category names pre-seeded with zero in stats.
    pub categories: Vec<&'static str>,
}

impl CollectorSettings {
    pub fn new(kind: RecordKind) -> Self {
        Self {
            kind,
            enable_console_log: true,
            enable_report: false,
            report_url: None,
            batch: BatchConfig::disabled(),
            batch_report_url: None,
            policy: PolicyConfig::default(),
            user_id: None,
            session_seed: None,
            custom_data: None,
            session_timeout: None,
            recent_k: 10,
            categories: Vec::new(),
        }
    }
}

/// What happened to a drafted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectOutcome {
    /// Matched an ignore rule. Not buffered, not reported.
    Ignored,
    /// Buffered; reporting is disabled.
    Retained,
    /// Buffered; sampling excluded it from delivery.
    SampledOut,
    /// Buffered; reporting is on but no endpoint resolved.
    NoEndpoint,
    /// Buffered and handed to the custom reporter hook.
    CustomReported,
    /// Buffered and waiting in the batch queue.
    Queued,
    /// Buffered; its arrival filled the batch and `count` records were sent.
    BatchFlushed { count: usize },
    /// Buffered and POSTed on its own.
    Delivered,
}

impl CollectOutcome {
    pub fn is_accepted(self) -> bool {
        self != Self::Ignored
    }
}

/// A single collector: normalizer, policy filter, ring buffer, batch queue,
/// and session, all exclusively owned.
pub struct Collector {
    settings: CollectorSettings,
    normalizer: Normalizer,
    policy: PolicyFilter,
    buffer: RingBuffer<Record>,
    reporter: Option<BatchReporter>,
    session: SessionTracker,
    custom_reporter: Option<Arc<dyn ICustomReporter>>,
    env: CollectorEnv,
}

impl Collector {
    pub fn new(settings: CollectorSettings, env: CollectorEnv) -> Self {
        let now = env.now();
        let policy = PolicyFilter::new(settings.policy.clone());
        let session = SessionTracker::new(settings.session_seed.clone(), now, settings.session_timeout);
        Self {
            normalizer: Normalizer::new(settings.user_id.clone(), settings.custom_data.clone()),
            buffer: RingBuffer::new(policy.max_records()),
            reporter: build_reporter(&settings, &env),
            policy,
            session,
            custom_reporter: None,
            settings,
            env,
        }
    }

    /// Route every report-eligible record to `reporter` instead of the
    /// built-in delivery path.
    pub fn set_custom_reporter(&mut self, reporter: Option<Arc<dyn ICustomReporter>>) {
        self.custom_reporter = reporter;
    }

    pub fn now(&self) -> i64 {
        self.env.now()
    }

    pub fn kind(&self) -> RecordKind {
        self.settings.kind
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    pub fn env(&self) -> &CollectorEnv {
        &self.env
    }

    /// Normalize, filter, buffer and, when eligible, report one record.
    pub fn collect(&mut self, draft: RecordDraft) -> CollectOutcome {
        let now = self.now();
        self.collect_at(draft, now)
    }

    /// Like [`collect`](Self::collect) for an event observed at `at`, such as
    /// a debounced source whose timer fired late. The record and the session
    /// activity carry `at`; batching still runs on the current time.
    pub fn collect_at(&mut self, draft: RecordDraft, at: i64) -> CollectOutcome {
        let now = self.now();
        let mut record = self.normalizer.normalize(
            draft,
            self.session.session_id(),
            at,
            self.env.page.as_ref(),
            self.env.random.as_ref(),
        );

        let report = match self.policy.evaluate(&mut record, self.env.random.as_ref()) {
            Decision::Reject(reason) => {
                if self.settings.enable_console_log {
                    events::record_ignored(self.kind(), reason.as_str(), &record.message);
                }
                return CollectOutcome::Ignored;
            }
            Decision::Accept { report } => report,
        };

        self.buffer.push(record.clone());
        self.session.touch(at);
        if self.settings.enable_console_log {
            events::record_collected(&record);
        }

        if !self.settings.enable_report {
            return CollectOutcome::Retained;
        }
        if !report {
            if self.settings.enable_console_log {
                events::record_sampled_out(self.kind(), &record.record_id);
            }
            return CollectOutcome::SampledOut;
        }
        if let Some(hook) = &self.custom_reporter {
            hook.report(&record);
            return CollectOutcome::CustomReported;
        }

        if let Some(reporter) = self.reporter.as_mut() {
            if reporter.url().is_none() {
                return CollectOutcome::NoEndpoint;
            }
            return match reporter.enqueue(record, now) {
                0 => CollectOutcome::Queued,
                count => CollectOutcome::BatchFlushed { count },
            };
        }

        match self.settings.report_url.clone() {
            Some(url) => {
                if self.settings.enable_console_log {
                    events::record_dispatched(self.kind(), &record.record_id, &url);
                }
                self.env
                    .transport
                    .dispatch(DeliveryRequest::new(url, Payload::Record(Box::new(record))));
                CollectOutcome::Delivered
            }
            None => CollectOutcome::NoEndpoint,
        }
    }

    /// Fire the batch interval if due. Returns records sent.
    pub fn tick(&mut self) -> usize {
        let now = self.now();
        self.reporter.as_mut().map_or(0, |r| r.tick(now))
    }

    /// Page became hidden: flush proactively.
    pub fn on_hidden(&mut self) -> usize {
        let now = self.now();
        self.reporter
            .as_mut()
            .map_or(0, |r| r.flush(FlushTrigger::Hidden, now))
    }

    /// Page is unloading: hand the queue to the beacon.
    pub fn on_unload(&mut self) -> usize {
        let now = self.now();
        self.reporter.as_mut().map_or(0, |r| r.flush_on_unload(now))
    }

    /// Manual flush. A no-op when batching is off or the queue is empty.
    pub fn flush(&mut self) -> usize {
        let now = self.now();
        self.reporter
            .as_mut()
            .map_or(0, |r| r.flush(FlushTrigger::Manual, now))
    }

    pub fn batch_status(&self) -> BatchQueueStatus {
        self.reporter
            .as_ref()
            .map_or_else(BatchQueueStatus::disabled, BatchReporter::status)
    }

    /// Earliest pending deadline (batch interval or session check).
    pub fn next_deadline(&self) -> Option<i64> {
        let batch = self.reporter.as_ref().and_then(BatchReporter::next_deadline);
        match (batch, self.session.next_check_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Snapshot of the ring buffer, oldest first.
    pub fn records(&self) -> Vec<Record> {
        self.buffer.snapshot()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Empty the ring buffer. The batch queue is untouched.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn stats(&self) -> RecordStats {
        compute_stats(
            self.buffer.iter(),
            &self.settings.categories,
            self.settings.recent_k,
        )
    }

    pub fn session(&self) -> &SessionTracker {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionTracker {
        &mut self.session
    }

    /// Swap in new settings. The buffer keeps its newest records up to the
    /// new capacity; anything queued is flushed to the old endpoint first.
    pub fn reconfigure(&mut self, settings: CollectorSettings) {
        let now = self.now();
        self.policy = PolicyFilter::new(settings.policy.clone());
        self.buffer.set_capacity(self.policy.max_records());
        self.normalizer = Normalizer::new(settings.user_id.clone(), settings.custom_data.clone());

        if let Some(reporter) = self.reporter.as_mut() {
            if settings.batch.enabled {
                reporter.reconfigure(&settings.batch, settings.batch_report_url.clone(), now);
                reporter.set_verbose(settings.enable_console_log);
            } else {
                reporter.flush(FlushTrigger::Reconfigure, now);
            }
        }
        if !settings.batch.enabled {
            self.reporter = None;
        } else if self.reporter.is_none() {
            self.reporter = build_reporter(&settings, &self.env);
        }

        if settings.session_timeout != self.settings.session_timeout {
            self.session.set_timeout(settings.session_timeout, now);
        }
        self.settings = settings;
        events::config_updated(self.kind());
    }
}

impl std::fmt::Debug for Collector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("kind", &self.settings.kind)
            .field("buffered", &self.buffer.len())
            .field("reporter", &self.reporter)
            .field("session", &self.session.session_id())
            .finish_non_exhaustive()
    }
}

fn build_reporter(settings: &CollectorSettings, env: &CollectorEnv) -> Option<BatchReporter> {
    if !settings.batch.enabled {
        return None;
    }
    let mut reporter = BatchReporter::new(
        settings.kind,
        &settings.batch,
        settings.batch_report_url.clone(),
        Arc::clone(&env.transport),
        Arc::clone(&env.beacon),
    );
    reporter.set_verbose(settings.enable_console_log);
    Some(reporter)
}
