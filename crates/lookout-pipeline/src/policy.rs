//! Ignore rules, severity defaults, and sampling.

use lookout_core::config::PolicyConfig;
use lookout_core::patterns::any_match;
use lookout_core::traits::IRandom;
use lookout_core::{Record, Severity};

/// Outcome of running a record through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Matched an ignore rule. The record is dropped without trace.
    Reject(RejectReason),
    /// Kept in the ring buffer. `report` says whether sampling made it
    /// eligible for delivery.
    Accept { report: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Message,
    Url,
    Target,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Url => "url",
            Self::Target => "target",
        }
    }
}

/// An immutable policy snapshot.
#[derive(Debug, Clone)]
pub struct PolicyFilter {
    config: PolicyConfig,
}

impl PolicyFilter {
    /// Out-of-range settings are coerced: the sample rate is clamped to
    /// `[0, 1]` (NaN becomes 1) and a zero capacity becomes one.
    pub fn new(mut config: PolicyConfig) -> Self {
        config.sample_rate = if config.sample_rate.is_nan() {
            1.0
        } else {
            config.sample_rate.clamp(0.0, 1.0)
        };
        config.max_records = config.max_records.max(1);
        Self { config }
    }

    pub fn config(&self) -> &PolicyConfig {
        &self.config
    }

    pub fn sample_rate(&self) -> f64 {
        self.config.sample_rate
    }

    pub fn max_records(&self) -> usize {
        self.config.max_records
    }

    /// The first ignore rule the record trips, if any.
    pub fn ignored(&self, record: &Record) -> Option<RejectReason> {
        if any_match(&self.config.ignore_messages, &record.message) {
            return Some(RejectReason::Message);
        }
        if !self.config.ignore_urls.is_empty() {
            let filename = record.as_error().and_then(|e| e.filename.as_deref());
            if any_match(&self.config.ignore_urls, &record.url)
                || filename.is_some_and(|f| any_match(&self.config.ignore_urls, f))
            {
                return Some(RejectReason::Url);
            }
        }
        if let Some(target) = record.target.as_deref() {
            if any_match(&self.config.ignore_targets, target) {
                return Some(RejectReason::Target);
            }
        }
        None
    }

    /// Fill in `level` from the per-category map when the source left it
    /// unset. Unmapped categories get medium.
    pub fn assign_level(&self, record: &mut Record) {
        if record.level.is_none() {
            let level = self
                .config
                .level_defaults
                .get(record.category())
                .copied()
                .unwrap_or(Severity::Medium);
            record.level = Some(level);
        }
    }

    /// One sampling draw. A rate of zero never reports and a rate of one
    /// always does, without consuming randomness.
    pub fn sampled(&self, random: &dyn IRandom) -> bool {
        let rate = self.config.sample_rate;
        if rate <= 0.0 {
            return false;
        }
        if rate >= 1.0 {
            return true;
        }
        random.next_f64() <= rate
    }

    /// Ignore check, level default, and sampling in one pass.
    pub fn evaluate(&self, record: &mut Record, random: &dyn IRandom) -> Decision {
        if let Some(reason) = self.ignored(record) {
            return Decision::Reject(reason);
        }
        self.assign_level(record);
        Decision::Accept {
            report: self.sampled(random),
        }
    }
}
