//! General heap monitor: growth rate between samples, a windowed leak
//! detector, threshold alerts, and a summary when the run ends.

use std::collections::VecDeque;

use serde::Serialize;

use lookout_core::config::MemoryConfig;
use lookout_core::constants::BYTES_PER_MB;
use lookout_core::models::{
    MemorySample, MemoryStats, MemorySummary, Rating, VitalAttachment, VitalName,
};
use lookout_core::traits::{duration_millis, HeapUsage};
use lookout_pipeline::normalizer::vital_id;
use lookout_pipeline::tracing_setup::events;
use lookout_pipeline::RecordDraft;

use crate::rating::{memory_rating, round2, round3, VitalDraft};
use crate::sampler::SamplerStep;

/// Share of increasing intervals that marks a leak.
const LEAK_TREND_SHARE: f64 = 0.8;
/// Average growth (MB/s) a leak must exceed.
const LEAK_MIN_GROWTH_MB_PER_SEC: f64 = 0.5;
/// Samples carried by leak records and stats.
pub const RECENT_SAMPLES: usize = 5;

/// MB/s between two samples. Zero when no time passed.
pub fn growth_rate(current: &MemorySample, previous: &MemorySample) -> f64 {
    let seconds = (current.timestamp - previous.timestamp) as f64 / 1000.0;
    if seconds <= 0.0 {
        return 0.0;
    }
    let mb = (current.used_heap_bytes as f64 - previous.used_heap_bytes as f64) / BYTES_PER_MB;
    mb / seconds
}

/// True when at least 80% of the intervals in the last `window` samples
/// grew and the average growth tops 0.5 MB/s.
pub fn detect_leak(samples: &[MemorySample], window: usize) -> bool {
    if window < 2 || samples.len() < window {
        return false;
    }
    let recent = &samples[samples.len() - window..];
    let rates: Vec<f64> = recent
        .windows(2)
        .map(|pair| growth_rate(&pair[1], &pair[0]))
        .collect();
    let intervals = rates.len() as f64;
    let increasing = rates.iter().filter(|r| **r > 0.0).count() as f64;
    let average = rates.iter().sum::<f64>() / intervals;
    increasing / intervals >= LEAK_TREND_SHARE && average > LEAK_MIN_GROWTH_MB_PER_SEC
}

/// Snapshot for `memory_stats()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryMonitorStats {
    pub samples_count: usize,
    pub average_usage: f64,
    pub max_usage: f64,
    pub min_usage: f64,
    pub average_growth_rate: f64,
    pub leak_detected: bool,
    pub recent_samples: Vec<MemorySample>,
}

#[derive(Debug, Clone)]
pub struct MemoryMonitor {
    config: MemoryConfig,
    started_at: i64,
    next_sample_at: i64,
    samples: VecDeque<MemorySample>,
    last: Option<MemorySample>,
    leak_detected: bool,
}

impl MemoryMonitor {
    pub fn start(config: MemoryConfig, now: i64) -> Self {
        Self {
            config,
            started_at: now,
            next_sample_at: now,
            samples: VecDeque::new(),
            last: None,
            leak_detected: false,
        }
    }

    pub fn deadline(&self) -> i64 {
        self.next_sample_at
    }

    pub fn leak_detected(&self) -> bool {
        self.leak_detected
    }

    pub fn samples(&self) -> impl Iterator<Item = &MemorySample> {
        self.samples.iter()
    }

    pub fn poll(&mut self, now: i64, heap: Option<HeapUsage>) -> SamplerStep {
        if now < self.next_sample_at {
            return SamplerStep::idle();
        }
        self.next_sample_at = now.saturating_add(duration_millis(self.config.interval_ms.max(1)));
        let Some(usage) = heap else {
            return SamplerStep::idle();
        };

        let mut sample = MemorySample {
            used_heap_bytes: usage.used_bytes,
            total_heap_bytes: usage.total_bytes,
            heap_limit_bytes: usage.limit_bytes,
            timestamp: now,
            usage_percent: usage.usage_percent(),
            growth_rate: None,
        };
        if let Some(previous) = &self.last {
            sample.growth_rate = Some(growth_rate(&sample, previous));
        }
        self.samples.push_back(sample);
        self.last = Some(sample);
        while self.samples.len() > self.config.max_samples.max(1) {
            self.samples.pop_front();
        }

        let mut drafts = Vec::new();
        if self.config.detect_leaks
            && !self.leak_detected
            && detect_leak(
                self.samples.make_contiguous(),
                self.config.leak_detection_window,
            )
        {
            self.leak_detected = true;
            drafts.push(self.leak_draft(sample, now));
        }

        let elapsed = now - self.started_at;
        if elapsed >= duration_millis(self.config.duration_ms) {
            return SamplerStep::finished(drafts);
        }

        let growth = sample.growth_rate.unwrap_or(0.0);
        if sample.usage_percent > self.config.usage_threshold
            || growth > self.config.growth_rate_threshold
        {
            drafts.push(self.alert_draft(sample, now, elapsed));
        }
        SamplerStep::sampled(drafts)
    }

    fn recent(&self) -> Vec<MemorySample> {
        let skip = self.samples.len().saturating_sub(RECENT_SAMPLES);
        self.samples.iter().skip(skip).copied().collect()
    }

    fn leak_draft(&self, sample: MemorySample, now: i64) -> RecordDraft {
        let value = round2(sample.growth_rate.unwrap_or(0.0));
        events::vital_alert(VitalName::MemoryLeak.as_str(), value, Rating::Poor.as_str());
        VitalDraft::new(
            VitalName::MemoryLeak,
            value,
            Rating::Poor,
            vital_id("memory-leak", now, None),
        )
        .with_attachment(VitalAttachment::MemoryLeakDetected {
            sample,
            recent: self.recent(),
        })
        .into_record()
    }

    fn alert_draft(&self, sample: MemorySample, now: i64, elapsed: i64) -> RecordDraft {
        let rating = memory_rating(sample.usage_percent, sample.growth_rate);
        let value = round2(sample.usage_percent);
        events::vital_alert(VitalName::Memory.as_str(), value, rating.as_str());
        let (average_usage, max_usage, _) = self.usage_bounds();
        VitalDraft::new(
            VitalName::Memory,
            value,
            rating,
            vital_id("memory", now, None),
        )
        .with_attachment(VitalAttachment::Memory {
            sample,
            stats: MemoryStats {
                samples_count: self.samples.len(),
                monitoring_duration_ms: elapsed,
                average_usage,
                max_usage,
            },
        })
        .into_record()
    }

    /// (average, max, min) usage percentage. Zeros when empty.
    fn usage_bounds(&self) -> (f64, f64, f64) {
        if self.samples.is_empty() {
            return (0.0, 0.0, 0.0);
        }
        let usages = self.samples.iter().map(|s| s.usage_percent);
        let average = usages.clone().sum::<f64>() / self.samples.len() as f64;
        let max = usages.clone().fold(f64::NEG_INFINITY, f64::max);
        let min = usages.fold(f64::INFINITY, f64::min);
        (average, max, min)
    }

    pub fn stats(&self) -> Option<MemoryMonitorStats> {
        if self.samples.is_empty() {
            return None;
        }
        let (average, max, min) = self.usage_bounds();
        let rates: Vec<f64> = self.samples.iter().filter_map(|s| s.growth_rate).collect();
        let average_growth_rate = if rates.is_empty() {
            0.0
        } else {
            rates.iter().sum::<f64>() / rates.len() as f64
        };
        Some(MemoryMonitorStats {
            samples_count: self.samples.len(),
            average_usage: round2(average),
            max_usage: round2(max),
            min_usage: round2(min),
            average_growth_rate: round3(average_growth_rate),
            leak_detected: self.leak_detected,
            recent_samples: self.recent(),
        })
    }

    /// Summary record. `None` when nothing was sampled.
    pub fn finish(self, now: i64) -> Option<RecordDraft> {
        let first = self.samples.front()?;
        let last = self.samples.back()?;
        let (average, max, min) = self.usage_bounds();
        let summary = MemorySummary {
            samples_count: self.samples.len(),
            monitoring_duration_ms: now - self.started_at,
            average_usage: round2(average),
            max_usage: round2(max),
            min_usage: round2(min),
            total_growth: round2(last.usage_percent - first.usage_percent),
            leak_detected: self.leak_detected,
            final_sample: Some(*last),
        };
        Some(
            VitalDraft::new(
                VitalName::MemorySummary,
                summary.average_usage,
                memory_rating(average, None),
                vital_id("memory-summary", now, None),
            )
            .with_attachment(VitalAttachment::MemorySummary(summary))
            .into_record(),
        )
    }
}
