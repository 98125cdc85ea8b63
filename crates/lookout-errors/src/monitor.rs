//! [`ErrorMonitor`]: the error collector instance owned by the host.

use std::sync::Arc;

use serde_json::Value;

use lookout_core::config::{merge_shallow, ErrorMonitorConfig};
use lookout_core::models::{BatchQueueStatus, ErrorType, RecordStats};
use lookout_core::traits::{ICustomReporter, IEventSource};
use lookout_core::{Record, RecordKind, Severity};
use lookout_pipeline::tracing_setup::events;
use lookout_pipeline::{CollectOutcome, Collector, CollectorEnv, CollectorSettings};

use crate::capture;
use crate::events::{
    ComponentFailure, ErrorEvent, HttpFailure, RejectionReason, ResourceFailure, ScriptError,
};

/// Number of records in `stats().recent`.
pub const RECENT_ERRORS: usize = 10;

fn collector_settings(config: &ErrorMonitorConfig) -> CollectorSettings {
    let mut settings = CollectorSettings::new(RecordKind::Error);
    settings.enable_console_log = config.enable_console_log;
    settings.enable_report = config.enable_report;
    settings.report_url = config.resolved_report_url();
    settings.batch = config.batch.clone();
    settings.batch_report_url = config.resolved_batch_url();
    settings.policy = config.policy();
    settings.user_id = config.user_id.clone();
    settings.session_seed = config.session_id.clone();
    settings.custom_data = config.custom_data.clone();
    settings.recent_k = RECENT_ERRORS;
    settings.categories = ErrorType::ALL.iter().map(|t| t.as_str()).collect();
    settings
}

/// Error collector.
#[derive(Debug)]
pub struct ErrorMonitor {
    config: ErrorMonitorConfig,
    collector: Collector,
}

impl ErrorMonitor {
    pub fn setup(config: ErrorMonitorConfig, env: CollectorEnv) -> Self {
        let collector = Collector::new(collector_settings(&config), env);
        events::monitor_started(RecordKind::Error, config.enable_report, config.batch.enabled);
        Self { config, collector }
    }

    pub fn config(&self) -> &ErrorMonitorConfig {
        &self.config
    }

    pub fn session_id(&self) -> &str {
        self.collector.session().session_id()
    }

    /// Install or remove the hook that replaces built-in delivery.
    pub fn set_custom_reporter(&mut self, reporter: Option<Arc<dyn ICustomReporter>>) {
        self.collector.set_custom_reporter(reporter);
    }

    // ── Sources ──

    pub fn on_global_error(&mut self, event: ScriptError) -> CollectOutcome {
        self.collector.collect(capture::script_error(event))
    }

    pub fn on_unhandled_rejection(&mut self, reason: RejectionReason) -> CollectOutcome {
        self.collector.collect(capture::rejection(reason))
    }

    /// Failures on `html`/`body` are not resource loads and are skipped.
    pub fn on_resource_error(&mut self, event: ResourceFailure) -> CollectOutcome {
        match capture::resource_failure(event) {
            Some(draft) => self.collector.collect(draft),
            None => CollectOutcome::Ignored,
        }
    }

    pub fn on_component_error(&mut self, event: ComponentFailure) -> CollectOutcome {
        self.collector.collect(capture::component_failure(event))
    }

    pub fn on_http_request_error(&mut self, event: HttpFailure) -> CollectOutcome {
        self.collector.collect(capture::http_request_failure(event))
    }

    pub fn on_http_response_error(&mut self, event: HttpFailure) -> CollectOutcome {
        let now = self.collector.now();
        self.collector
            .collect(capture::http_response_failure(event, now))
    }

    pub fn handle(&mut self, event: ErrorEvent) -> CollectOutcome {
        match event {
            ErrorEvent::Script(e) => self.on_global_error(e),
            ErrorEvent::Rejection(r) => self.on_unhandled_rejection(r),
            ErrorEvent::Resource(e) => self.on_resource_error(e),
            ErrorEvent::Component(e) => self.on_component_error(e),
            ErrorEvent::HttpRequest(e) => self.on_http_request_error(e),
            ErrorEvent::HttpResponse(e) => self.on_http_response_error(e),
        }
    }

    /// Drain `source` and handle every event. Returns how many were accepted.
    pub fn pump(&mut self, source: &mut dyn IEventSource<ErrorEvent>) -> usize {
        source
            .drain()
            .into_iter()
            .map(|e| self.handle(e))
            .filter(|o| o.is_accepted())
            .count()
    }

    /// Manual report. `level` defaults to low.
    pub fn report_custom(
        &mut self,
        message: &str,
        custom_data: Option<Value>,
        level: Option<Severity>,
    ) -> CollectOutcome {
        self.collector.collect(capture::custom(
            message,
            custom_data,
            level.unwrap_or(Severity::Low),
        ))
    }

    // ── Introspection & control ──

    pub fn stats(&self) -> RecordStats {
        self.collector.stats()
    }

    pub fn errors(&self) -> Vec<Record> {
        self.collector.records()
    }

    pub fn clear(&mut self) {
        self.collector.clear();
    }

    /// Apply a partial config. Top-level keys replace the current ones; an
    /// invalid patch is logged and leaves the monitor unchanged.
    pub fn update_config(&mut self, patch: &Value) -> bool {
        match merge_shallow(&self.config, patch) {
            Ok(next) => {
                self.collector.reconfigure(collector_settings(&next));
                self.config = next;
                true
            }
            Err(e) => {
                events::config_rejected(RecordKind::Error, &e.to_string());
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

    /// Fire timers that are due. Returns records sent.
    pub fn tick(&mut self) -> usize {
        self.collector.tick()
    }

    pub fn next_deadline(&self) -> Option<i64> {
        self.collector.next_deadline()
    }

    pub fn on_visibility_hidden(&mut self) -> usize {
        self.collector.on_hidden()
    }

    pub fn on_page_unload(&mut self) -> usize {
        self.collector.on_unload()
    }
}
