//! [`BehaviorMonitor`]: the behavior collector instance owned by the host.
//!
//! Clicks, inputs and resizes are debounced and scrolls are throttled. The
//! timers are deadlines, so nothing is emitted until the host calls
//! [`BehaviorMonitor::tick`] (or any other entry point) at or after the due
//! time. The session idle check runs on the same polling path.

use std::sync::Arc;

use serde_json::Value;

use lookout_core::config::{merge_shallow, BehaviorMonitorConfig};
use lookout_core::models::{BatchQueueStatus, BehaviorType, EndReason, RecordStats};
use lookout_core::traits::{duration_millis, ICustomReporter, IEventSource};
use lookout_core::{Record, RecordKind, Severity};
use lookout_pipeline::tracing_setup::events;
use lookout_pipeline::{
    CollectOutcome, Collector, CollectorEnv, CollectorSettings, RecordDraft, TimeoutPolicy,
};

use crate::capture::{self, ScrollMark};
use crate::events::{
    BehaviorEvent, ClickEvent, FocusEvent, InputEvent, NavigationEvent, ResizeEvent, ScrollEvent,
};
use crate::timers::{Debouncer, KeyedDebouncer, Throttle};

/// Number of records in `stats().recent`.
pub const RECENT_BEHAVIORS: usize = 20;

fn collector_settings(config: &BehaviorMonitorConfig) -> CollectorSettings {
    let mut settings = CollectorSettings::new(RecordKind::Behavior);
    settings.enable_console_log = config.enable_console_log;
    settings.enable_report = config.enable_report;
    settings.report_url = config.resolved_report_url();
    settings.batch = config.batch.clone();
    settings.batch_report_url = config.resolved_batch_url();
    settings.policy = config.policy();
    settings.user_id = config.user_id.clone();
    settings.session_seed = config.session_id.clone();
    settings.custom_data = config.custom_data.clone();
    settings.session_timeout = config.session.enabled.then(|| TimeoutPolicy {
        timeout_ms: duration_millis(config.session.timeout_ms),
        check_interval_ms: duration_millis(config.session.check_interval_ms),
    });
    settings.recent_k = RECENT_BEHAVIORS;
    settings.categories = BehaviorType::ALL.iter().map(|t| t.as_str()).collect();
    settings
}

/// Debounce and throttle state for the DOM sources.
#[derive(Debug)]
struct PendingSources {
    click: Debouncer<ClickEvent>,
    scroll: Throttle<ScrollEvent>,
    input: KeyedDebouncer<InputEvent>,
    resize: Debouncer<ResizeEvent>,
    last_scroll: ScrollMark,
}

impl PendingSources {
    fn new(config: &BehaviorMonitorConfig, now: i64) -> Self {
        Self {
            click: Debouncer::new(config.click.debounce_ms),
            scroll: Throttle::new(config.scroll.throttle_ms),
            input: KeyedDebouncer::new(config.input.debounce_ms),
            resize: Debouncer::new(config.page.resize_debounce_ms),
            last_scroll: ScrollMark {
                scroll_y: 0.0,
                at: now,
            },
        }
    }

    fn apply(&mut self, config: &BehaviorMonitorConfig) {
        self.click.set_delay(config.click.debounce_ms);
        self.scroll.set_interval(config.scroll.throttle_ms);
        self.input.set_delay(config.input.debounce_ms);
        self.resize.set_delay(config.page.resize_debounce_ms);
    }

    fn cancel_all(&mut self) {
        self.click.cancel();
        self.scroll.cancel();
        self.input.cancel_all();
        self.resize.cancel();
    }

    fn deadline(&self) -> Option<i64> {
        [
            self.click.deadline(),
            self.scroll.deadline(),
            self.input.deadline(),
            self.resize.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }
}

/// Behavior collector.
#[derive(Debug)]
pub struct BehaviorMonitor {
    config: BehaviorMonitorConfig,
    collector: Collector,
    pending: PendingSources,
    destroyed: bool,
}

impl BehaviorMonitor {
    /// Build the collector, then emit `session_start` and the initial page
    /// view when configured.
    pub fn setup(config: BehaviorMonitorConfig, env: CollectorEnv) -> Self {
        let collector = Collector::new(collector_settings(&config), env);
        let pending = PendingSources::new(&config, collector.now());
        let mut monitor = Self {
            config,
            collector,
            pending,
            destroyed: false,
        };
        events::monitor_started(
            RecordKind::Behavior,
            monitor.config.enable_report,
            monitor.config.batch.enabled,
        );

        if monitor.config.session.enabled && monitor.config.session.track_session_start {
            monitor.collector.collect(capture::session_start());
        }
        if monitor.config.page.enabled && monitor.config.page.track_page_view {
            monitor.record_page_view();
        }
        monitor
    }

    pub fn config(&self) -> &BehaviorMonitorConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        self.collector.session().session_id()
    }

    pub fn set_custom_reporter(&mut self, reporter: Option<Arc<dyn ICustomReporter>>) {
        self.collector.set_custom_reporter(reporter);
    }

    // ── Sources ──

    pub fn on_click(&mut self, event: ClickEvent) {
        let now = self.maintain();
        if self.destroyed || !self.config.click.enabled {
            return;
        }
        self.pending.click.schedule(event, now);
    }

    pub fn on_scroll(&mut self, event: ScrollEvent) {
        let now = self.maintain();
        if self.destroyed || !self.config.scroll.enabled {
            return;
        }
        self.pending.scroll.offer(event, now);
    }

    pub fn on_input(&mut self, event: InputEvent) {
        let now = self.maintain();
        if self.destroyed || !self.config.input.enabled {
            return;
        }
        self.pending.input.schedule(event.field_name(), event, now);
    }

    pub fn on_focus(&mut self, event: FocusEvent) -> CollectOutcome {
        self.maintain();
        if self.destroyed || !self.config.focus.enabled {
            return CollectOutcome::Ignored;
        }
        self.collector.collect(capture::focus(&event, false))
    }

    pub fn on_blur(&mut self, event: FocusEvent) -> CollectOutcome {
        self.maintain();
        if self.destroyed || !self.config.focus.enabled || !self.config.focus.track_blur {
            return CollectOutcome::Ignored;
        }
        self.collector.collect(capture::focus(&event, true))
    }

    pub fn on_resize(&mut self, event: ResizeEvent) {
        let now = self.maintain();
        if self.destroyed || !self.config.page.enabled || !self.config.page.track_resize {
            return;
        }
        self.pending.resize.schedule(event, now);
    }

    pub fn on_navigation(&mut self, event: NavigationEvent) -> CollectOutcome {
        self.maintain();
        if self.destroyed || !self.config.page.enabled || !self.config.page.track_navigation {
            return CollectOutcome::Ignored;
        }
        self.collector.collect(capture::navigation(&event))
    }

    /// Record a page view from the current page context.
    pub fn record_page_view(&mut self) -> CollectOutcome {
        let draft = capture::page_view(self.collector.env().page.as_ref());
        self.collector.collect(draft)
    }

    pub fn handle(&mut self, event: BehaviorEvent) {
        match event {
            BehaviorEvent::Click(e) => self.on_click(e),
            BehaviorEvent::Scroll(e) => self.on_scroll(e),
            BehaviorEvent::Input(e) => self.on_input(e),
            BehaviorEvent::Focus(e) => {
                self.on_focus(e);
            }
            BehaviorEvent::Blur(e) => {
                self.on_blur(e);
            }
            BehaviorEvent::Resize(e) => self.on_resize(e),
            BehaviorEvent::Navigation(e) => {
                self.on_navigation(e);
            }
        }
    }

    /// Drain `source` and handle every event in order.
    pub fn pump(&mut self, source: &mut dyn IEventSource<BehaviorEvent>) -> usize {
        let batch = source.drain();
        let count = batch.len();
        for event in batch {
            self.handle(event);
        }
        count
    }

    /// Manual report. `level` defaults to low.
    pub fn report_custom(
        &mut self,
        action: &str,
        custom_data: Option<Value>,
        level: Option<Severity>,
    ) -> CollectOutcome {
        self.maintain();
        self.collector.collect(capture::custom(
            action,
            custom_data,
            level.unwrap_or(Severity::Low),
        ))
    }

    // ── Timers ──

    /// Fire every due debounce/throttle timer, run the session idle check,
    /// then the batch interval. Returns records sent by the batch interval.
    pub fn tick(&mut self) -> usize {
        self.maintain();
        self.collector.tick()
    }

    /// Earliest pending deadline across source timers, the session check and
    /// the batch interval.
    pub fn next_deadline(&self) -> Option<i64> {
        [self.pending.deadline(), self.collector.next_deadline()]
            .into_iter()
            .flatten()
            .min()
    }

    fn maintain(&mut self) -> i64 {
        let now = self.collector.now();
        if self.destroyed {
            return now;
        }
        self.fire_due_sources(now);
        self.check_session(now);
        now
    }

    fn fire_due_sources(&mut self, now: i64) {
        let mut due: Vec<(i64, RecordDraft)> = Vec::new();

        if let Some(deadline) = self.pending.click.deadline() {
            if let Some(event) = self.pending.click.poll(now) {
                due.push((deadline, capture::click(&event, &self.config.click)));
            }
        }
        if let Some(deadline) = self.pending.scroll.deadline() {
            if let Some(event) = self.pending.scroll.poll(now) {
                due.push((
                    deadline,
                    capture::scroll(&event, self.pending.last_scroll, deadline, &self.config.scroll),
                ));
                self.pending.last_scroll = ScrollMark {
                    scroll_y: event.scroll_y,
                    at: deadline,
                };
            }
        }
        for (deadline, event) in self.pending.input.poll(now) {
            due.push((deadline, capture::input(&event, &self.config.input)));
        }
        if let Some(deadline) = self.pending.resize.deadline() {
            if let Some(event) = self.pending.resize.poll(now) {
                due.push((deadline, capture::resize(&event)));
            }
        }

        // Timers that fired late replay in deadline order, each preceded by
        // the idle check it would have met on time.
        due.sort_by_key(|(deadline, _)| *deadline);
        for (deadline, draft) in due {
            self.check_session(deadline);
            self.collector.collect_at(draft, deadline);
        }
    }

    /// Emit `session_end` for a session found expired at `at`, with its own
    /// id, then rotate.
    fn check_session(&mut self, at: i64) {
        let Some(expired) = self.collector.session_mut().poll_expired(at) else {
            return;
        };
        if self.config.session.track_session_end {
            self.collector.collect_at(
                capture::session_end(expired.duration_ms(at), EndReason::Timeout),
                at,
            );
        }
        let old = self.collector.session_mut().rotate(at);
        events::session_rotated(&old.session_id, self.session_id(), expired.idle_ms(at));
    }

    // ── Page lifecycle ──

    pub fn on_visibility_hidden(&mut self) -> usize {
        self.maintain();
        self.collector.on_hidden()
    }

    /// Emit `session_end` with reason `page_unload`, then hand the batch
    /// queue to the beacon.
    pub fn on_page_unload(&mut self) -> usize {
        let now = self.maintain();
        if !self.destroyed && self.config.session.enabled && self.config.session.track_session_end {
            let duration = self.collector.session().session().duration_ms(now);
            self.collector
                .collect(capture::session_end(duration, EndReason::PageUnload));
        }
        self.collector.on_unload()
    }

    /// Cancel pending source timers and the session check. Buffered records
    /// and the batch queue are kept.
    pub fn destroy(&mut self) {
        self.pending.cancel_all();
        self.collector.session_mut().cancel_checks();
        self.destroyed = true;
        events::monitor_stopped(RecordKind::Behavior, "all");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    // ── Introspection & control ──

    pub fn stats(&self) -> RecordStats {
        let mut stats = self.collector.stats();
        let now = self.collector.now();
        stats.session_duration = Some(self.collector.session().session().duration_ms(now));
        stats
    }

    pub fn behaviors(&self) -> Vec<Record> {
        self.collector.records()
    }

    pub fn clear(&mut self) {
        self.collector.clear();
    }

    pub fn update_config(&mut self, patch: &Value) -> bool {
        match merge_shallow(&self.config, patch) {
            Ok(next) => {
                self.collector.reconfigure(collector_settings(&next));
                self.pending.apply(&next);
                self.config = next;
                true
            }
            Err(e) => {
                events::config_rejected(RecordKind::Behavior, &e.to_string());
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
}
