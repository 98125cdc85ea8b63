//! Property tests for the deadline timers.

use lookout_behavior::{Debouncer, Throttle};
use proptest::prelude::*;

proptest! {
    /// A burst of schedules fires exactly once, with the last value, `delay`
    /// after the last schedule.
    #[test]
    fn debounce_fires_once_with_last_value(
        delay in 1u64..1_000,
        gaps in prop::collection::vec(0i64..500, 1..30),
    ) {
        let mut d = Debouncer::new(delay);
        let mut now = 0i64;
        for (i, gap) in gaps.iter().enumerate() {
            now += gap;
            d.schedule(i, now);
        }
        let last = gaps.len() - 1;
        prop_assert_eq!(d.poll(now + delay as i64 - 1), None);
        prop_assert_eq!(d.poll(now + delay as i64), Some(last));
        prop_assert_eq!(d.poll(now + 10 * delay as i64), None);
    }

    /// Offers inside one window never move its deadline.
    #[test]
    fn throttle_deadline_is_fixed_per_window(
        interval in 1u64..1_000,
        offsets in prop::collection::vec(0i64..1_000, 1..30),
    ) {
        let mut t = Throttle::new(interval);
        t.offer(0usize, 0);
        for (i, off) in offsets.iter().enumerate() {
            let at = off % interval as i64;
            t.offer(i + 1, at);
            prop_assert_eq!(t.deadline(), Some(interval as i64));
        }
        prop_assert_eq!(t.poll(interval as i64), Some(offsets.len()));
    }
}
