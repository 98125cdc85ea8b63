//! The facade owning all three monitors.

use serde::Serialize;

use lookout_behavior::BehaviorMonitor;
use lookout_core::config::LookoutConfig;
use lookout_core::errors::LookoutResult;
use lookout_core::models::RecordStats;
use lookout_errors::ErrorMonitor;
use lookout_pipeline::CollectorEnv;
use lookout_vitals::VitalsMonitor;

/// Construction options.
#[derive(Debug, Clone, Default)]
pub struct LookoutOptions {
    /// TOML overlay. `None` runs every collector on its defaults.
    pub config_toml: Option<String>,
}

/// Per-collector stats snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookoutStats {
    pub error: RecordStats,
    pub behavior: RecordStats,
    pub vitals: RecordStats,
}

/// Owns the error, behavior and vitals monitors. Each gets its own clone
/// of the environment, so they share clock, transports and page context.
#[derive(Debug)]
pub struct Lookout {
    env: CollectorEnv,
    errors: ErrorMonitor,
    behavior: BehaviorMonitor,
    vitals: VitalsMonitor,
}

impl Lookout {
    pub fn new(config: LookoutConfig, env: CollectorEnv) -> Self {
        let LookoutConfig {
            error,
            behavior,
            vitals,
        } = config;
        Self {
            errors: ErrorMonitor::setup(error, env.clone()),
            behavior: BehaviorMonitor::setup(behavior, env.clone()),
            vitals: VitalsMonitor::setup(vitals, env.clone()),
            env,
        }
    }

    pub fn with_options(opts: LookoutOptions, env: CollectorEnv) -> LookoutResult<Self> {
        let config = match opts.config_toml {
            Some(ref toml_str) => LookoutConfig::from_toml(toml_str)?,
            None => LookoutConfig::default(),
        };
        Ok(Self::new(config, env))
    }

    pub fn from_toml(toml_str: &str, env: CollectorEnv) -> LookoutResult<Self> {
        Self::with_options(
            LookoutOptions {
                config_toml: Some(toml_str.to_string()),
            },
            env,
        )
    }

    pub fn now(&self) -> i64 {
        self.env.now()
    }

    pub fn env(&self) -> &CollectorEnv {
        &self.env
    }

    pub fn errors(&self) -> &ErrorMonitor {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorMonitor {
        &mut self.errors
    }

    pub fn behavior(&self) -> &BehaviorMonitor {
        &self.behavior
    }

    pub fn behavior_mut(&mut self) -> &mut BehaviorMonitor {
        &mut self.behavior
    }

    pub fn vitals(&self) -> &VitalsMonitor {
        &self.vitals
    }

    pub fn vitals_mut(&mut self) -> &mut VitalsMonitor {
        &mut self.vitals
    }

    // ── Fan-out ──

    /// Fire every due timer in every monitor. Returns records sent.
    pub fn tick(&mut self) -> usize {
        self.errors.tick() + self.behavior.tick() + self.vitals.tick()
    }

    /// Earliest deadline across all monitors.
    pub fn next_deadline(&self) -> Option<i64> {
        [
            self.errors.next_deadline(),
            self.behavior.next_deadline(),
            self.vitals.next_deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    pub fn flush_all(&mut self) -> usize {
        self.errors.flush_batch() + self.behavior.flush_batch() + self.vitals.flush_batch()
    }

    pub fn on_visibility_hidden(&mut self) -> usize {
        self.errors.on_visibility_hidden()
            + self.behavior.on_visibility_hidden()
            + self.vitals.on_visibility_hidden()
    }

    /// Hand every queue to the beacon. Vitals sub-collectors stop first so
    /// their summaries ride along.
    pub fn on_page_unload(&mut self) -> usize {
        self.errors.on_page_unload() + self.behavior.on_page_unload() + self.vitals.on_page_unload()
    }

    pub fn stats(&self) -> LookoutStats {
        LookoutStats {
            error: self.errors.stats(),
            behavior: self.behavior.stats(),
            vitals: self.vitals.stats(),
        }
    }

    pub fn clear(&mut self) {
        self.errors.clear();
        self.behavior.clear();
        self.vitals.clear();
    }
}
