//! Vitals payloads: core web vitals plus the FPS, long-task, and memory
//! sub-collectors.

use serde::{Deserialize, Serialize};

/// Metric reported by the vitals collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VitalName {
    #[serde(rename = "LCP")]
    Lcp,
    #[serde(rename = "CLS")]
    Cls,
    #[serde(rename = "FCP")]
    Fcp,
    #[serde(rename = "TTFB")]
    Ttfb,
    #[serde(rename = "INP")]
    Inp,
    #[serde(rename = "FPS")]
    Fps,
    LongTask,
    LongTaskSummary,
    MemoryLeak,
    MemoryLeakSummary,
    Memory,
    MemorySummary,
}

impl VitalName {
    pub const ALL: [VitalName; 12] = [
        Self::Lcp,
        Self::Cls,
        Self::Fcp,
        Self::Ttfb,
        Self::Inp,
        Self::Fps,
        Self::LongTask,
        Self::LongTaskSummary,
        Self::MemoryLeak,
        Self::MemoryLeakSummary,
        Self::Memory,
        Self::MemorySummary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lcp => "LCP",
            Self::Cls => "CLS",
            Self::Fcp => "FCP",
            Self::Ttfb => "TTFB",
            Self::Inp => "INP",
            Self::Fps => "FPS",
            Self::LongTask => "LongTask",
            Self::LongTaskSummary => "LongTaskSummary",
            Self::MemoryLeak => "MemoryLeak",
            Self::MemoryLeakSummary => "MemoryLeakSummary",
            Self::Memory => "Memory",
            Self::MemorySummary => "MemorySummary",
        }
    }
}

/// Three-band rating shared by every vital.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rating {
    Good,
    NeedsImprovement,
    Poor,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::NeedsImprovement => "needs-improvement",
            Self::Poor => "poor",
        }
    }
}

/// Direction of heap usage across the most recent samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryTrend {
    #[default]
    Stable,
    Increasing,
    Decreasing,
}

/// Vital-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalDetail {
    pub name: VitalName,
    pub value: f64,
    pub rating: Rating,
    pub delta: f64,
    /// Host-supplied metric id, or one generated by the sub-collector.
    pub metric_id: String,
    pub navigation_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment: Option<VitalAttachment>,
}

/// Extra statistics carried by the sub-collector records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VitalAttachment {
    FpsStats(FpsStats),
    LongTask {
        task: LongTaskEntry,
        stats: LongTaskStats,
    },
    LongTaskSummary(LongTaskSummary),
    MemoryLeak {
        sample: MemoryLeakSample,
        samples: usize,
    },
    MemoryLeakSummary(MemoryLeakSummary),
    Memory {
        sample: MemorySample,
        stats: MemoryStats,
    },
    MemoryLeakDetected {
        sample: MemorySample,
        recent: Vec<MemorySample>,
    },
    MemorySummary(MemorySummary),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FpsStats {
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

/// Attribution entry reported alongside a long task.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTaskAttribution {
    pub name: String,
    pub entry_type: String,
    pub start_time: f64,
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTaskEntry {
    pub name: String,
    pub duration: f64,
    pub start_time: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attribution: Vec<LongTaskAttribution>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTaskStats {
    pub total_tasks: u64,
    pub total_duration: f64,
    pub average_duration: f64,
    pub max_duration: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTaskSummary {
    #[serde(flatten)]
    pub stats: LongTaskStats,
    /// Most recent tasks, newest last.
    pub tasks: Vec<LongTaskEntry>,
}

/// One sample taken by the memory-leak heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryLeakSample {
    pub used_heap_bytes: u64,
    pub total_heap_bytes: u64,
    pub heap_limit_bytes: u64,
    /// Used heap as a percentage of the limit.
    pub memory_usage: f64,
    pub timestamp: i64,
    /// 0-100.
    pub leak_score: u32,
    pub trend: MemoryTrend,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryLeakSummary {
    pub total_samples: usize,
    pub monitoring_duration_ms: i64,
    pub total_growth_bytes: i64,
    pub avg_memory_usage: f64,
    pub max_memory_usage: f64,
    pub avg_leak_score: f64,
    pub baseline_bytes: u64,
    pub final_bytes: u64,
    pub samples: Vec<MemoryLeakSample>,
}

/// One sample taken by the general memory monitor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySample {
    pub used_heap_bytes: u64,
    pub total_heap_bytes: u64,
    pub heap_limit_bytes: u64,
    pub timestamp: i64,
    pub usage_percent: f64,
    /// MB/s relative to the previous sample.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryStats {
    pub samples_count: usize,
    pub monitoring_duration_ms: i64,
    pub average_usage: f64,
    pub max_usage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySummary {
    pub samples_count: usize,
    pub monitoring_duration_ms: i64,
    pub average_usage: f64,
    pub max_usage: f64,
    pub min_usage: f64,
    /// Usage percentage points gained between first and last sample.
    pub total_growth: f64,
    pub leak_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_sample: Option<MemorySample>,
}
