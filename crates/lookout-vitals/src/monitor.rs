//! [`VitalsMonitor`]: the vitals collector instance owned by the host.
//!
//! Sub-collectors whose `enabled` flag is set start during setup. Each one
//! can be stopped on its own, which emits its summary record, and started
//! again later with fresh state.

use std::sync::Arc;

use serde_json::Value;

use lookout_core::config::{merge_shallow, VitalsMonitorConfig};
use lookout_core::models::{BatchQueueStatus, RecordStats, VitalName};
use lookout_core::traits::{HeapUsage, ICustomReporter, IEventSource, IHeapInspector};
use lookout_core::{LookoutError, LookoutResult, Record, RecordKind, Severity};
use lookout_pipeline::tracing_setup::events;
use lookout_pipeline::{CollectOutcome, Collector, CollectorEnv, CollectorSettings, RecordDraft};

use crate::events::{LongTaskTiming, VitalsEvent, WebVitalMetric};
use crate::fps::FpsSampler;
use crate::long_task::{LongTaskObserver, LongTaskReport};
use crate::memory::{MemoryMonitor, MemoryMonitorStats};
use crate::memory_leak::{MemoryLeakMonitor, MemoryLeakStats};
use crate::rating::{rate, round2, VitalDraft};
use crate::sampler::SamplerStep;

/// Number of records in `stats().recent`.
pub const RECENT_VITALS: usize = 10;

/// Names the web-vitals bridge accepts.
pub const CORE_VITALS: [VitalName; 5] = [
    VitalName::Lcp,
    VitalName::Cls,
    VitalName::Fcp,
    VitalName::Ttfb,
    VitalName::Inp,
];

const HEAP_CAPABILITY: &str = "heap inspector";

fn collector_settings(config: &VitalsMonitorConfig) -> CollectorSettings {
    let mut settings = CollectorSettings::new(RecordKind::Vital);
    settings.enable_console_log = config.enable_console_log;
    settings.enable_report = config.enable_report;
    settings.report_url = config.resolved_report_url();
    settings.batch = config.batch.clone();
    settings.batch_report_url = config.resolved_batch_url();
    settings.policy = config.policy();
    settings.user_id = config.user_id.clone();
    settings.session_seed = config.session_id.clone();
    settings.custom_data = config.custom_data.clone();
    settings.recent_k = RECENT_VITALS;
    settings.categories = VitalName::ALL.iter().map(|n| n.as_str()).collect();
    settings
}

/// Vitals collector.
#[derive(Debug)]
pub struct VitalsMonitor {
    config: VitalsMonitorConfig,
    collector: Collector,
    fps: Option<FpsSampler>,
    long_tasks: Option<LongTaskObserver>,
    memory_leak: Option<MemoryLeakMonitor>,
    memory: Option<MemoryMonitor>,
}

impl VitalsMonitor {
    pub fn setup(config: VitalsMonitorConfig, env: CollectorEnv) -> Self {
        let collector = Collector::new(collector_settings(&config), env);
        events::monitor_started(RecordKind::Vital, config.enable_report, config.batch.enabled);
        let mut monitor = Self {
            config,
            collector,
            fps: None,
            long_tasks: None,
            memory_leak: None,
            memory: None,
        };

        if monitor.config.long_task.enabled {
            monitor.start_long_tasks();
        }
        if monitor.config.fps.enabled {
            monitor.start_fps();
        }
        if monitor.config.memory_leak.enabled {
            if let Err(e) = monitor.start_memory_leak() {
                tracing::debug!(error = %e, "memory leak monitor not started");
            }
        }
        if monitor.config.memory.enabled {
            if let Err(e) = monitor.start_memory() {
                tracing::debug!(error = %e, "memory monitor not started");
            }
        }
        monitor
    }

    pub fn config(&self) -> &VitalsMonitorConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        self.collector.session().session_id()
    }

    /// Install or remove the hook that replaces built-in delivery.
    pub fn set_custom_reporter(&mut self, reporter: Option<Arc<dyn ICustomReporter>>) {
        self.collector.set_custom_reporter(reporter);
    }

    // ── Core vitals ──

    /// Record a metric from the web-vitals library. Value and delta are
    /// rounded to two decimals; the host's metric id becomes the record id.
    pub fn on_web_vital(&mut self, metric: WebVitalMetric) -> CollectOutcome {
        if !CORE_VITALS.contains(&metric.name) {
            return CollectOutcome::Ignored;
        }
        let rating = rate(metric.name, metric.value, &self.config.thresholds);
        let mut draft = VitalDraft::new(metric.name, round2(metric.value), rating, metric.id)
            .with_delta(round2(metric.delta));
        draft.navigation_type = metric.navigation_type;
        self.collector.collect(draft.into_record())
    }

    // ── FPS ──

    /// Start a fresh sampling window at the current time.
    pub fn start_fps(&mut self) {
        let now = self.collector.now();
        self.fps = Some(FpsSampler::start(self.config.fps.clone(), now));
    }

    pub fn is_fps_running(&self) -> bool {
        self.fps.is_some()
    }

    /// An animation frame rendered now. Returns the FPS record's outcome
    /// once the window closes.
    pub fn on_animation_frame(&mut self) -> Option<CollectOutcome> {
        let now = self.collector.now();
        let expired = self.fps.as_mut()?.on_frame(now);
        if expired {
            self.stop_fps()
        } else {
            None
        }
    }

    /// Stop sampling and report average/min/max if any sample was taken.
    pub fn stop_fps(&mut self) -> Option<CollectOutcome> {
        let sampler = self.fps.take()?;
        events::monitor_stopped(RecordKind::Vital, "fps");
        let now = self.collector.now();
        sampler.finish(now).map(|draft| self.collector.collect(draft))
    }

    // ── Long tasks ──

    pub fn start_long_tasks(&mut self) {
        self.long_tasks = Some(LongTaskObserver::new(self.config.long_task.clone()));
    }

    /// Feed performance-observer entries. Returns how many records were
    /// accepted.
    pub fn on_long_tasks(&mut self, entries: Vec<LongTaskTiming>) -> usize {
        let now = self.collector.now();
        let random = Arc::clone(&self.collector.env().random);
        let Some(observer) = self.long_tasks.as_mut() else {
            return 0;
        };
        let drafts: Vec<RecordDraft> = entries
            .into_iter()
            .filter_map(|entry| observer.observe(entry, now, random.as_ref()))
            .collect();
        self.collect_all(drafts)
    }

    /// Stop observing and emit the summary when any task was counted.
    pub fn stop_long_tasks(&mut self) -> Option<CollectOutcome> {
        let observer = self.long_tasks.take()?;
        events::monitor_stopped(RecordKind::Vital, "long_task");
        let now = self.collector.now();
        observer.finish(now).map(|draft| self.collector.collect(draft))
    }

    /// `None` when the observer is not running.
    pub fn long_task_stats(&self) -> Option<LongTaskReport> {
        self.long_tasks.as_ref().map(LongTaskObserver::report)
    }

    // ── Heap ──

    fn require_heap(&self, part: &str) -> LookoutResult<()> {
        if self.collector.env().heap.is_some() {
            return Ok(());
        }
        events::capability_unavailable(RecordKind::Vital, part, HEAP_CAPABILITY);
        Err(LookoutError::Unsupported {
            capability: HEAP_CAPABILITY.to_string(),
        })
    }

    /// Start the leak heuristic. The first sample is taken immediately.
    pub fn start_memory_leak(&mut self) -> LookoutResult<()> {
        self.require_heap("memory_leak")?;
        let now = self.collector.now();
        self.memory_leak = Some(MemoryLeakMonitor::start(
            self.config.memory_leak.clone(),
            now,
        ));
        self.poll_memory_leak(now);
        Ok(())
    }

    pub fn stop_memory_leak(&mut self) -> Option<CollectOutcome> {
        let monitor = self.memory_leak.take()?;
        events::monitor_stopped(RecordKind::Vital, "memory_leak");
        let now = self.collector.now();
        monitor.finish(now).map(|draft| self.collector.collect(draft))
    }

    pub fn memory_leak_stats(&self) -> Option<MemoryLeakStats> {
        let now = self.collector.now();
        self.memory_leak.as_ref().map(|m| m.stats(now))
    }

    /// Start the general heap monitor. The first sample is taken immediately.
    pub fn start_memory(&mut self) -> LookoutResult<()> {
        self.require_heap("memory")?;
        let now = self.collector.now();
        self.memory = Some(MemoryMonitor::start(self.config.memory.clone(), now));
        self.poll_memory(now);
        Ok(())
    }

    pub fn stop_memory(&mut self) -> Option<CollectOutcome> {
        let monitor = self.memory.take()?;
        events::monitor_stopped(RecordKind::Vital, "memory");
        let now = self.collector.now();
        monitor.finish(now).map(|draft| self.collector.collect(draft))
    }

    pub fn memory_stats(&self) -> Option<MemoryMonitorStats> {
        self.memory.as_ref().and_then(MemoryMonitor::stats)
    }

    fn sample_heap(&self) -> Option<HeapUsage> {
        self.collector
            .env()
            .heap
            .as_ref()
            .and_then(|h| IHeapInspector::sample(h.as_ref()))
    }

    fn poll_memory_leak(&mut self, now: i64) {
        let Some(deadline) = self.memory_leak.as_ref().map(MemoryLeakMonitor::deadline) else {
            return;
        };
        if now < deadline {
            return;
        }
        let heap = self.sample_heap();
        let step = match self.memory_leak.as_mut() {
            Some(monitor) => monitor.poll(now, heap),
            None => SamplerStep::idle(),
        };
        self.apply_step(step, Self::stop_memory_leak);
    }

    fn poll_memory(&mut self, now: i64) {
        let Some(deadline) = self.memory.as_ref().map(MemoryMonitor::deadline) else {
            return;
        };
        if now < deadline {
            return;
        }
        let heap = self.sample_heap();
        let step = match self.memory.as_mut() {
            Some(monitor) => monitor.poll(now, heap),
            None => SamplerStep::idle(),
        };
        self.apply_step(step, Self::stop_memory);
    }

    fn apply_step(&mut self, step: SamplerStep, stop: fn(&mut Self) -> Option<CollectOutcome>) {
        self.collect_all(step.drafts);
        if step.finished {
            stop(self);
        }
    }

    fn collect_all(&mut self, drafts: Vec<RecordDraft>) -> usize {
        drafts
            .into_iter()
            .map(|d| self.collector.collect(d))
            .filter(|o| o.is_accepted())
            .count()
    }

    // ── Sources ──

    /// Returns how many records the event produced and the pipeline accepted.
    pub fn handle(&mut self, event: VitalsEvent) -> usize {
        match event {
            VitalsEvent::WebVital(metric) => usize::from(self.on_web_vital(metric).is_accepted()),
            VitalsEvent::LongTasks(entries) => self.on_long_tasks(entries),
            VitalsEvent::AnimationFrame => self
                .on_animation_frame()
                .map_or(0, |o| usize::from(o.is_accepted())),
        }
    }

    /// Drain `source` and handle every event. Returns how many records were
    /// accepted.
    pub fn pump(&mut self, source: &mut dyn IEventSource<VitalsEvent>) -> usize {
        source.drain().into_iter().map(|e| self.handle(e)).sum()
    }

    /// Manual metric report, rated against the configured thresholds.
    /// `level` overrides the level the rating implies.
    pub fn report_custom(
        &mut self,
        name: VitalName,
        value: f64,
        custom_data: Option<Value>,
        level: Option<Severity>,
    ) -> CollectOutcome {
        let rating = rate(name, value, &self.config.thresholds);
        let mut draft = VitalDraft::new(name, round2(value), rating, String::new()).into_record();
        if let Some(level) = level {
            draft = draft.with_level(level);
        }
        if let Some(data) = custom_data {
            draft = draft.with_custom_data(data);
        }
        self.collector.collect(draft)
    }

    // ── Timers ──

    /// Fire due heap samples, close an expired FPS window, then the batch
    /// interval. Returns records sent by the batch flush.
    pub fn tick(&mut self) -> usize {
        let now = self.collector.now();
        if self.fps.as_ref().is_some_and(|f| f.is_expired(now)) {
            self.stop_fps();
        }
        self.poll_memory_leak(now);
        self.poll_memory(now);
        self.collector.tick()
    }

    pub fn next_deadline(&self) -> Option<i64> {
        [
            self.fps.as_ref().map(FpsSampler::deadline),
            self.memory_leak.as_ref().map(MemoryLeakMonitor::deadline),
            self.memory.as_ref().map(MemoryMonitor::deadline),
            self.collector.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    // ── Introspection & control ──

    pub fn stats(&self) -> RecordStats {
        self.collector.stats()
    }

    pub fn vitals(&self) -> Vec<Record> {
        self.collector.records()
    }

    pub fn clear(&mut self) {
        self.collector.clear();
    }

    /// Apply a partial config. Running samplers keep the settings they
    /// started with, except the long-task observer which adopts the new
    /// threshold and retention at once.
    pub fn update_config(&mut self, patch: &Value) -> bool {
        match merge_shallow(&self.config, patch) {
            Ok(next) => {
                self.collector.reconfigure(collector_settings(&next));
                if let Some(observer) = self.long_tasks.as_mut() {
                    observer.set_config(next.long_task.clone());
                }
                self.config = next;
                true
            }
            Err(e) => {
                events::config_rejected(RecordKind::Vital, &e.to_string());
                false
            }
        }
    }

    pub fn flush_batch(&mut self) -> usize {
        self.collector.flush()
    }

    pub fn batch_status(&self) -> BatchQueueStatus {
        self.collector.batch_status()
    }

    pub fn on_visibility_hidden(&mut self) -> usize {
        self.collector.on_hidden()
    }

    /// Stop every running sub-collector so its summary joins the final
    /// beacon, then flush.
    pub fn on_page_unload(&mut self) -> usize {
        self.stop_all();
        self.collector.on_unload()
    }

    /// Stop every sub-collector, emitting their summaries.
    pub fn stop_all(&mut self) {
        self.stop_fps();
        self.stop_long_tasks();
        self.stop_memory_leak();
        self.stop_memory();
    }
}
