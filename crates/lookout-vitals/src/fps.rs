//! Fixed-duration frame-rate sampler.
//!
//! Each sample counts the frames since the previous sample boundary, so a
//! slow stretch shows up in its own sample instead of being averaged away.

use lookout_core::config::FpsConfig;
use lookout_core::models::{FpsStats, VitalAttachment, VitalName};
use lookout_core::traits::duration_millis;
use lookout_pipeline::normalizer::vital_id;
use lookout_pipeline::RecordDraft;

use crate::rating::{fps_rating, round2, VitalDraft};

#[derive(Debug, Clone)]
pub struct FpsSampler {
    config: FpsConfig,
    started_at: i64,
    sample_start: i64,
    frames: u64,
    samples: Vec<f64>,
}

impl FpsSampler {
    pub fn start(config: FpsConfig, now: i64) -> Self {
        Self {
            config,
            started_at: now,
            sample_start: now,
            frames: 0,
            samples: Vec::new(),
        }
    }

    /// Count one rendered frame. Returns true once the window has elapsed.
    pub fn on_frame(&mut self, now: i64) -> bool {
        self.frames += 1;
        let since_boundary = now - self.sample_start;
        if since_boundary > 0 && since_boundary as u64 >= self.config.sample_interval_ms {
            self.samples
                .push(self.frames as f64 * 1000.0 / since_boundary as f64);
            self.frames = 0;
            self.sample_start = now;
        }
        self.is_expired(now)
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now - self.started_at >= duration_millis(self.config.duration_ms)
    }

    /// When the window closes.
    pub fn deadline(&self) -> i64 {
        self.started_at.saturating_add(duration_millis(self.config.duration_ms))
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Average, min and max across the samples taken so far.
    pub fn stats(&self) -> Option<FpsStats> {
        if self.samples.is_empty() {
            return None;
        }
        let sum: f64 = self.samples.iter().sum();
        let min = self.samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(FpsStats {
            average: round2(sum / self.samples.len() as f64),
            min: round2(min),
            max: round2(max),
            samples: self.samples.len(),
        })
    }

    /// Final report. `None` when no sample was taken.
    pub fn finish(self, now: i64) -> Option<RecordDraft> {
        let stats = self.stats()?;
        Some(
            VitalDraft::new(
                VitalName::Fps,
                stats.average,
                fps_rating(stats.average),
                vital_id("fps", now, None),
            )
            .with_attachment(VitalAttachment::FpsStats(stats))
            .into_record(),
        )
    }
}

#[cfg(test)]
mod tests {
    use lookout_core::models::RecordDetail;

    use super::*;

    fn config(duration_ms: u64, sample_interval_ms: u64) -> FpsConfig {
        FpsConfig {
            enabled: true,
            duration_ms,
            sample_interval_ms,
        }
    }

    #[test]
    fn samples_are_relative_to_the_last_boundary() {
        let mut fps = FpsSampler::start(config(1_000, 100), 0);
        // 10 frames in the first 100ms, then 5 frames in the next 100ms.
        for t in 1..=10 {
            fps.on_frame(t * 10);
        }
        for t in 1..=5 {
            fps.on_frame(100 + t * 20);
        }
        assert_eq!(fps.samples(), &[100.0, 50.0]);
    }

    #[test]
    fn expires_after_duration() {
        let mut fps = FpsSampler::start(config(200, 100), 0);
        assert!(!fps.on_frame(100));
        assert!(fps.on_frame(200));
        assert_eq!(fps.deadline(), 200);
    }

    #[test]
    fn finish_reports_average_min_max() {
        let mut fps = FpsSampler::start(config(1_000, 100), 0);
        fps.on_frame(100); // 1 frame / 100ms = 10fps
        fps.on_frame(150);
        fps.on_frame(200); // 2 frames / 100ms = 20fps
        let draft = fps.finish(5_000).unwrap();
        let RecordDetail::Vital(detail) = draft.detail else {
            panic!("expected a vital");
        };
        assert_eq!(detail.metric_id, "fps-5000");
        assert_eq!(detail.value, 15.0);
        assert_eq!(
            detail.attachment,
            Some(VitalAttachment::FpsStats(FpsStats {
                average: 15.0,
                min: 10.0,
                max: 20.0,
                samples: 2,
            }))
        );
    }

    #[test]
    fn finish_without_samples_reports_nothing() {
        let fps = FpsSampler::start(config(1_000, 100), 0);
        assert!(fps.finish(10).is_none());
    }
}
