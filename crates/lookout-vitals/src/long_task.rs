//! Long-task observer.

use std::collections::VecDeque;

use serde::Serialize;

use lookout_core::config::LongTaskConfig;
use lookout_core::models::{
    LongTaskEntry, LongTaskStats, LongTaskSummary, VitalAttachment, VitalName,
};
use lookout_core::traits::IRandom;
use lookout_pipeline::normalizer::vital_id;
use lookout_pipeline::RecordDraft;

use crate::events::{LongTaskTiming, LONG_TASK_ENTRY_TYPE};
use crate::rating::{long_task_rating, VitalDraft};

/// Tasks carried by the summary record.
pub const SUMMARY_TASKS: usize = 10;

/// Tasks carried by [`LongTaskReport`].
pub const RECENT_TASKS: usize = 5;

/// Point-in-time view of the observer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTaskReport {
    #[serde(flatten)]
    pub stats: LongTaskStats,
    pub recent_tasks: Vec<LongTaskEntry>,
}

#[derive(Debug, Clone)]
pub struct LongTaskObserver {
    config: LongTaskConfig,
    tasks: VecDeque<LongTaskEntry>,
    total_tasks: u64,
    total_duration: f64,
    max_duration: f64,
}

impl LongTaskObserver {
    pub fn new(config: LongTaskConfig) -> Self {
        Self {
            config,
            tasks: VecDeque::new(),
            total_tasks: 0,
            total_duration: 0.0,
            max_duration: 0.0,
        }
    }

    pub fn set_config(&mut self, config: LongTaskConfig) {
        self.config = config;
        while self.tasks.len() > self.config.max_tasks {
            self.tasks.pop_front();
        }
    }

    /// Count `entry` if it is a long task over the threshold and build its
    /// record.
    pub fn observe(
        &mut self,
        entry: LongTaskTiming,
        now: i64,
        random: &dyn IRandom,
    ) -> Option<RecordDraft> {
        if entry.entry_type != LONG_TASK_ENTRY_TYPE || entry.duration < self.config.threshold_ms {
            return None;
        }

        self.total_tasks += 1;
        self.total_duration += entry.duration;
        self.max_duration = self.max_duration.max(entry.duration);

        let task = LongTaskEntry {
            name: if entry.name.is_empty() {
                "unknown".to_string()
            } else {
                entry.name
            },
            duration: entry.duration,
            start_time: entry.start_time,
            attribution: if self.config.include_attribution {
                entry.attribution
            } else {
                Vec::new()
            },
        };

        if self.config.max_tasks == 0 {
            self.tasks.clear();
        } else {
            while self.tasks.len() >= self.config.max_tasks {
                self.tasks.pop_front();
            }
            self.tasks.push_back(task.clone());
        }

        Some(
            VitalDraft::new(
                VitalName::LongTask,
                task.duration,
                long_task_rating(task.duration),
                vital_id("longtask", now, Some(random)),
            )
            .with_attachment(VitalAttachment::LongTask {
                task,
                stats: self.stats(),
            })
            .into_record(),
        )
    }

    pub fn stats(&self) -> LongTaskStats {
        LongTaskStats {
            total_tasks: self.total_tasks,
            total_duration: self.total_duration,
            average_duration: if self.total_tasks > 0 {
                self.total_duration / self.total_tasks as f64
            } else {
                0.0
            },
            max_duration: self.max_duration,
        }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &LongTaskEntry> {
        self.tasks.iter()
    }

    pub fn report(&self) -> LongTaskReport {
        LongTaskReport {
            stats: self.stats(),
            recent_tasks: self.recent(RECENT_TASKS),
        }
    }

    fn recent(&self, n: usize) -> Vec<LongTaskEntry> {
        let skip = self.tasks.len().saturating_sub(n);
        self.tasks.iter().skip(skip).cloned().collect()
    }

    /// Summary record. `None` when no task was counted.
    pub fn finish(self, now: i64) -> Option<RecordDraft> {
        if self.total_tasks == 0 {
            return None;
        }
        let total = self.total_tasks as f64;
        let summary = LongTaskSummary {
            stats: self.stats(),
            tasks: self.recent(SUMMARY_TASKS),
        };
        Some(
            VitalDraft::new(
                VitalName::LongTaskSummary,
                total,
                long_task_rating(total),
                vital_id("longtask-summary", now, None),
            )
            .with_attachment(VitalAttachment::LongTaskSummary(summary))
            .into_record(),
        )
    }
}
