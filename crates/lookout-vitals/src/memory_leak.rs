//! Heap-growth leak heuristic.
//!
//! Every interval the heap is sampled and scored out of 100:
//!
//! - up to 70 points for the growth rate since the baseline, scaled against
//!   `growth_rate_threshold` (MB/min);
//! - up to 30 points for the share of the heap limit in use.
//!
//! A record is emitted for the first sample and for every sample scoring
//! above [`LEAK_SCORE_ALERT`] while the trend is increasing.

use std::collections::VecDeque;

use serde::Serialize;

use lookout_core::config::MemoryLeakConfig;
use lookout_core::constants::BYTES_PER_MB;
use lookout_core::models::{
    MemoryLeakSample, MemoryLeakSummary, MemoryTrend, VitalAttachment, VitalName,
};
use lookout_core::traits::{duration_millis, HeapUsage};
use lookout_pipeline::normalizer::vital_id;
use lookout_pipeline::RecordDraft;

use crate::rating::{round2, usage_rating, VitalDraft};
use crate::sampler::SamplerStep;

/// Score above which an increasing trend is reported as a leak.
pub const LEAK_SCORE_ALERT: u32 = 50;

const GROWTH_WEIGHT: f64 = 70.0;
const USAGE_WEIGHT: f64 = 30.0;

/// Samples carried by summaries and stats.
pub const RECENT_SAMPLES: usize = 5;

/// Score for a heap that grew `growth_bytes` over `elapsed_ms`.
pub fn leak_score(growth_bytes: f64, elapsed_ms: i64, usage_percent: f64, threshold: f64) -> u32 {
    let minutes = elapsed_ms.max(1) as f64 / 60_000.0;
    let rate_mb_per_min = growth_bytes / BYTES_PER_MB / minutes;
    let growth = if threshold > 0.0 {
        (rate_mb_per_min / threshold * GROWTH_WEIGHT).clamp(0.0, GROWTH_WEIGHT)
    } else if rate_mb_per_min > 0.0 {
        GROWTH_WEIGHT
    } else {
        0.0
    };
    let usage = (usage_percent / 100.0 * USAGE_WEIGHT).clamp(0.0, USAGE_WEIGHT);
    (growth + usage).round() as u32
}

/// Trend across the last three samples: half the used-heap change compared
/// against `threshold` MB.
pub fn trend(window: &[MemoryLeakSample], threshold: f64) -> MemoryTrend {
    let [.., first, _, last] = window else {
        return MemoryTrend::Stable;
    };
    let avg_growth = (last.used_heap_bytes as f64 - first.used_heap_bytes as f64) / 2.0;
    let limit = threshold * BYTES_PER_MB;
    if avg_growth > limit {
        MemoryTrend::Increasing
    } else if avg_growth < -limit {
        MemoryTrend::Decreasing
    } else {
        MemoryTrend::Stable
    }
}

/// Running view for `memory_leak_stats()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryLeakStats {
    pub is_running: bool,
    pub monitoring_duration_ms: i64,
    pub baseline_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<MemoryLeakSummary>,
}

#[derive(Debug, Clone)]
pub struct MemoryLeakMonitor {
    config: MemoryLeakConfig,
    started_at: i64,
    next_sample_at: i64,
    baseline: Option<u64>,
    taken: u64,
    samples: VecDeque<MemoryLeakSample>,
}

impl MemoryLeakMonitor {
    /// The first sample is due immediately.
    pub fn start(config: MemoryLeakConfig, now: i64) -> Self {
        Self {
            config,
            started_at: now,
            next_sample_at: now,
            baseline: None,
            taken: 0,
            samples: VecDeque::new(),
        }
    }

    pub fn deadline(&self) -> i64 {
        self.next_sample_at
    }

    pub fn samples(&self) -> impl Iterator<Item = &MemoryLeakSample> {
        self.samples.iter()
    }

    /// Take a sample if one is due.
    pub fn poll(&mut self, now: i64, heap: Option<HeapUsage>) -> SamplerStep {
        if now < self.next_sample_at {
            return SamplerStep::idle();
        }
        let elapsed = now - self.started_at;
        if elapsed >= duration_millis(self.config.max_monitoring_duration_ms) {
            return SamplerStep::finished(Vec::new());
        }
        self.next_sample_at = now.saturating_add(duration_millis(self.config.interval_ms.max(1)));

        let Some(usage) = heap else {
            return SamplerStep::idle();
        };
        let sample = self.record(usage, now, elapsed);
        self.taken += 1;

        let first = self.taken == 1;
        let leaking =
            sample.leak_score > LEAK_SCORE_ALERT && sample.trend == MemoryTrend::Increasing;
        let mut drafts = Vec::new();
        if first || leaking {
            drafts.push(self.sample_draft(sample, now));
        }
        SamplerStep::sampled(drafts)
    }

    fn record(&mut self, usage: HeapUsage, now: i64, elapsed: i64) -> MemoryLeakSample {
        let baseline = *self.baseline.get_or_insert(usage.used_bytes);
        let usage_percent = usage.usage_percent();
        let growth = usage.used_bytes as f64 - baseline as f64;

        let mut sample = MemoryLeakSample {
            used_heap_bytes: usage.used_bytes,
            total_heap_bytes: usage.total_bytes,
            heap_limit_bytes: usage.limit_bytes,
            memory_usage: usage_percent,
            timestamp: now,
            leak_score: leak_score(
                growth,
                elapsed,
                usage_percent,
                self.config.growth_rate_threshold,
            ),
            trend: MemoryTrend::Stable,
        };
        self.samples.push_back(sample);
        while self.samples.len() > self.config.trend_window_size.max(1) {
            self.samples.pop_front();
        }

        sample.trend = trend(
            self.samples.make_contiguous(),
            self.config.growth_rate_threshold,
        );
        if let Some(last) = self.samples.back_mut() {
            last.trend = sample.trend;
        }
        sample
    }

    fn sample_draft(&self, sample: MemoryLeakSample, now: i64) -> RecordDraft {
        let rating = usage_rating(
            sample.memory_usage,
            self.config.warning_threshold,
            self.config.danger_threshold,
        );
        VitalDraft::new(
            VitalName::MemoryLeak,
            round2(sample.memory_usage),
            rating,
            vital_id("memory", now, None),
        )
        .with_delta(f64::from(sample.leak_score))
        .with_attachment(VitalAttachment::MemoryLeak {
            sample,
            samples: self.samples.len(),
        })
        .into_record()
    }

    pub fn summary(&self, now: i64) -> Option<MemoryLeakSummary> {
        let first = self.samples.front()?;
        let last = self.samples.back()?;
        let n = self.samples.len() as f64;
        let avg_usage = self.samples.iter().map(|s| s.memory_usage).sum::<f64>() / n;
        let max_usage = self
            .samples
            .iter()
            .map(|s| s.memory_usage)
            .fold(f64::NEG_INFINITY, f64::max);
        let avg_score = self
            .samples
            .iter()
            .map(|s| f64::from(s.leak_score))
            .sum::<f64>()
            / n;
        let skip = self.samples.len().saturating_sub(RECENT_SAMPLES);

        Some(MemoryLeakSummary {
            total_samples: self.samples.len(),
            monitoring_duration_ms: now - self.started_at,
            total_growth_bytes: last.used_heap_bytes as i64 - first.used_heap_bytes as i64,
            avg_memory_usage: round2(avg_usage),
            max_memory_usage: round2(max_usage),
            avg_leak_score: round2(avg_score),
            baseline_bytes: self.baseline.unwrap_or(first.used_heap_bytes),
            final_bytes: last.used_heap_bytes,
            samples: self.samples.iter().skip(skip).copied().collect(),
        })
    }

    pub fn stats(&self, now: i64) -> MemoryLeakStats {
        MemoryLeakStats {
            is_running: true,
            monitoring_duration_ms: now - self.started_at,
            baseline_bytes: self.baseline,
            summary: self.summary(now),
        }
    }

    /// Summary record. `None` when nothing was sampled.
    pub fn finish(self, now: i64) -> Option<RecordDraft> {
        let summary = self.summary(now)?;
        let rating = usage_rating(
            summary.avg_memory_usage,
            self.config.warning_threshold,
            self.config.danger_threshold,
        );
        Some(
            VitalDraft::new(
                VitalName::MemoryLeakSummary,
                summary.avg_memory_usage,
                rating,
                vital_id("memory-summary", now, None),
            )
            .with_delta(summary.avg_leak_score)
            .with_attachment(VitalAttachment::MemoryLeakSummary(summary))
            .into_record(),
        )
    }
}
