//! Property tests for the heap-growth leak heuristic.

use proptest::prelude::*;

use lookout_core::config::MemoryLeakConfig;
use lookout_core::models::MemoryTrend;
use lookout_core::traits::HeapUsage;
use lookout_vitals::memory_leak::{MemoryLeakMonitor, LEAK_SCORE_ALERT};

const MB: u64 = 1024 * 1024;

fn config(interval_ms: u64) -> MemoryLeakConfig {
    MemoryLeakConfig {
        enabled: true,
        interval_ms,
        growth_rate_threshold: 10.0,
        trend_window_size: 10,
        max_monitoring_duration_ms: u64::MAX / 2,
        ..MemoryLeakConfig::default()
    }
}

fn usage(used_mb: u64) -> Option<HeapUsage> {
    Some(HeapUsage {
        used_bytes: used_mb * MB,
        total_bytes: used_mb * MB,
        limit_bytes: 100_000 * MB,
    })
}

proptest! {
    #[test]
    fn steady_growth_is_flagged_from_third_sample(
        start_mb in 10u64..500,
        step_mb in 11u64..100,
        interval_ms in 1_000u64..=60_000,
        count in 3usize..12,
    ) {
        let mut monitor = MemoryLeakMonitor::start(config(interval_ms), 0);
        for i in 0..count {
            let now = i as i64 * interval_ms as i64;
            monitor.poll(now, usage(start_mb + i as u64 * step_mb));
            let last = *monitor.samples().last().unwrap();
            if i >= 2 {
                prop_assert!(last.leak_score > LEAK_SCORE_ALERT, "score {}", last.leak_score);
                prop_assert_eq!(last.trend, MemoryTrend::Increasing);
            }
        }
    }

    #[test]
    fn flat_heap_never_trends(
        used_mb in 10u64..5_000,
        count in 1usize..12,
    ) {
        let mut monitor = MemoryLeakMonitor::start(config(5_000), 0);
        for i in 0..count {
            let step = monitor.poll(i as i64 * 5_000, usage(used_mb));
            prop_assert!(!step.finished);
            let last = *monitor.samples().last().unwrap();
            prop_assert_eq!(last.trend, MemoryTrend::Stable);
        }
    }

    #[test]
    fn score_is_bounded(
        growth_mb in -1_000.0f64..10_000.0,
        elapsed in 0i64..1_000_000,
        usage_percent in 0.0f64..150.0,
    ) {
        let score = lookout_vitals::memory_leak::leak_score(
            growth_mb * MB as f64,
            elapsed,
            usage_percent,
            10.0,
        );
        prop_assert!(score <= 100);
    }
}
