//! Rating bands and the shared draft builder for vitals records.
//!
//! Core vitals are lower-is-better: good up to the threshold, needs
//! improvement up to 1.5x. FPS and long-task counts use fixed bands.

use lookout_core::config::VitalsThresholds;
use lookout_core::models::{Rating, VitalAttachment, VitalDetail, VitalName};
use lookout_core::{RecordDetail, Severity};
use lookout_pipeline::RecordDraft;

/// Navigation type stamped on records the sub-collectors generate.
pub const SYNTHETIC_NAVIGATION: &str = "navigate";

const NEEDS_IMPROVEMENT_FACTOR: f64 = 1.5;

/// Lower-is-better band against `threshold`.
pub fn threshold_rating(value: f64, threshold: f64) -> Rating {
    if value <= threshold {
        Rating::Good
    } else if value <= threshold * NEEDS_IMPROVEMENT_FACTOR {
        Rating::NeedsImprovement
    } else {
        Rating::Poor
    }
}

/// Frames per second: 60 and up is good, 30 and up needs improvement.
pub fn fps_rating(fps: f64) -> Rating {
    if fps >= 60.0 {
        Rating::Good
    } else if fps >= 30.0 {
        Rating::NeedsImprovement
    } else {
        Rating::Poor
    }
}

/// Long-task band: 5 or fewer is good, 15 or fewer needs improvement.
pub fn long_task_rating(value: f64) -> Rating {
    if value <= 5.0 {
        Rating::Good
    } else if value <= 15.0 {
        Rating::NeedsImprovement
    } else {
        Rating::Poor
    }
}

/// Heap usage percentage plus optional growth in MB/s.
pub fn memory_rating(usage_percent: f64, growth_rate: Option<f64>) -> Rating {
    let growth = growth_rate.unwrap_or(0.0);
    if usage_percent > 90.0 || growth > 2.0 {
        Rating::Poor
    } else if usage_percent > 70.0 || growth > 1.0 {
        Rating::NeedsImprovement
    } else {
        Rating::Good
    }
}

/// Usage rating against the leak monitor's warning and danger percentages.
pub fn usage_rating(usage_percent: f64, warning: f64, danger: f64) -> Rating {
    if usage_percent >= danger {
        Rating::Poor
    } else if usage_percent >= warning {
        Rating::NeedsImprovement
    } else {
        Rating::Good
    }
}

/// Rating for `name` using the configured thresholds.
pub fn rate(name: VitalName, value: f64, thresholds: &VitalsThresholds) -> Rating {
    match name {
        VitalName::Lcp => threshold_rating(value, thresholds.lcp),
        VitalName::Cls => threshold_rating(value, thresholds.cls),
        VitalName::Fcp => threshold_rating(value, thresholds.fcp),
        VitalName::Ttfb => threshold_rating(value, thresholds.ttfb),
        VitalName::Inp => threshold_rating(value, thresholds.inp),
        VitalName::Fps => fps_rating(value),
        VitalName::LongTask | VitalName::LongTaskSummary => long_task_rating(value),
        VitalName::MemoryLeak | VitalName::MemoryLeakSummary => {
            usage_rating(value, 80.0, 90.0)
        }
        VitalName::Memory | VitalName::MemorySummary => memory_rating(value, None),
    }
}

/// Severity recorded for a rating.
pub fn level_for(rating: Rating) -> Severity {
    match rating {
        Rating::Good => Severity::Low,
        Rating::NeedsImprovement => Severity::Medium,
        Rating::Poor => Severity::High,
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Fields of a vitals record before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct VitalDraft {
    pub name: VitalName,
    pub value: f64,
    pub rating: Rating,
    pub delta: f64,
    pub metric_id: String,
    pub navigation_type: String,
    pub attachment: Option<VitalAttachment>,
}

impl VitalDraft {
    pub fn new(name: VitalName, value: f64, rating: Rating, metric_id: impl Into<String>) -> Self {
        Self {
            name,
            value,
            rating,
            delta: 0.0,
            metric_id: metric_id.into(),
            navigation_type: SYNTHETIC_NAVIGATION.to_string(),
            attachment: None,
        }
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_attachment(mut self, attachment: VitalAttachment) -> Self {
        self.attachment = Some(attachment);
        self
    }

    /// Pipeline draft: message is the metric name, level follows the rating.
    pub fn into_record(self) -> RecordDraft {
        let level = level_for(self.rating);
        let message = self.name.as_str();
        RecordDraft::new(
            message,
            RecordDetail::Vital(VitalDetail {
                name: self.name,
                value: self.value,
                rating: self.rating,
                delta: self.delta,
                metric_id: self.metric_id,
                navigation_type: self.navigation_type,
                attachment: self.attachment,
            }),
        )
        .with_level(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_bands_extend_to_one_and_a_half() {
        assert_eq!(threshold_rating(2_500.0, 2_500.0), Rating::Good);
        assert_eq!(threshold_rating(3_750.0, 2_500.0), Rating::NeedsImprovement);
        assert_eq!(threshold_rating(3_750.1, 2_500.0), Rating::Poor);
    }

    #[test]
    fn fps_is_higher_is_better() {
        assert_eq!(fps_rating(60.0), Rating::Good);
        assert_eq!(fps_rating(30.0), Rating::NeedsImprovement);
        assert_eq!(fps_rating(29.9), Rating::Poor);
    }

    #[test]
    fn long_task_bands() {
        assert_eq!(long_task_rating(5.0), Rating::Good);
        assert_eq!(long_task_rating(15.0), Rating::NeedsImprovement);
        assert_eq!(long_task_rating(16.0), Rating::Poor);
    }

    #[test]
    fn memory_rating_considers_growth() {
        assert_eq!(memory_rating(50.0, None), Rating::Good);
        assert_eq!(memory_rating(50.0, Some(1.5)), Rating::NeedsImprovement);
        assert_eq!(memory_rating(50.0, Some(2.5)), Rating::Poor);
        assert_eq!(memory_rating(95.0, None), Rating::Poor);
    }

    #[test]
    fn levels_follow_rating() {
        assert_eq!(level_for(Rating::Good), Severity::Low);
        assert_eq!(level_for(Rating::NeedsImprovement), Severity::Medium);
        assert_eq!(level_for(Rating::Poor), Severity::High);
    }

    #[test]
    fn draft_carries_name_as_message() {
        let draft = VitalDraft::new(VitalName::Fps, 58.0, Rating::NeedsImprovement, "fps-1")
            .into_record();
        assert_eq!(draft.message, "FPS");
        assert_eq!(draft.level, Some(Severity::Medium));
    }
}
