//! Deadline timers. Nothing here sleeps; the owner polls with the current
//! time and receives the value whose deadline has passed.

use std::collections::BTreeMap;

use lookout_core::traits::duration_millis;

/// Fires `delay` after the most recent call to [`schedule`](Self::schedule),
/// carrying the most recent value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay_ms: i64,
    pending: Option<(i64, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms: duration_millis(delay_ms),
            pending: None,
        }
    }

    /// Replace any pending value and restart the delay.
    pub fn schedule(&mut self, value: T, now: i64) {
        self.pending = Some((now.saturating_add(self.delay_ms), value));
    }

    pub fn poll(&mut self, now: i64) -> Option<T> {
        if self.deadline().is_some_and(|due| due <= now) {
            self.pending.take().map(|(_, v)| v)
        } else {
            None
        }
    }

    pub fn deadline(&self) -> Option<i64> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Applies to the next [`schedule`](Self::schedule); a pending deadline
    /// is kept.
    pub fn set_delay(&mut self, delay_ms: u64) {
        self.delay_ms = duration_millis(delay_ms);
    }
}

/// Fires at most once per `interval`, counted from the first call in a
/// window, carrying the latest value offered in that window.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval_ms: i64,
    pending: Option<(i64, T)>,
}

impl<T> Throttle<T> {
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: duration_millis(interval_ms),
            pending: None,
        }
    }

    /// Open a window if none is open; otherwise refresh its value.
    pub fn offer(&mut self, value: T, now: i64) {
        if let Some((_, slot)) = self.pending.as_mut() {
            *slot = value;
            return;
        }
        self.pending = Some((now.saturating_add(self.interval_ms), value));
    }

    pub fn poll(&mut self, now: i64) -> Option<T> {
        if self.deadline().is_some_and(|due| due <= now) {
            self.pending.take().map(|(_, v)| v)
        } else {
            None
        }
    }

    pub fn deadline(&self) -> Option<i64> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn set_interval(&mut self, interval_ms: u64) {
        self.interval_ms = duration_millis(interval_ms);
    }
}

/// One independent [`Debouncer`] per key.
#[derive(Debug, Clone)]
pub struct KeyedDebouncer<T> {
    delay_ms: i64,
    pending: BTreeMap<String, (i64, T)>,
}

impl<T> KeyedDebouncer<T> {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms: duration_millis(delay_ms),
            pending: BTreeMap::new(),
        }
    }

    pub fn schedule(&mut self, key: impl Into<String>, value: T, now: i64) {
        self.pending.insert(key.into(), (now.saturating_add(self.delay_ms), value));
    }

    /// Every due value, earliest deadline first.
    pub fn poll(&mut self, now: i64) -> Vec<(i64, T)> {
        let due: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, (at, _))| *at <= now)
            .map(|(k, _)| k.clone())
            .collect();
        let mut fired: Vec<(i64, T)> = due
            .into_iter()
            .filter_map(|k| self.pending.remove(&k))
            .collect();
        fired.sort_by_key(|(at, _)| *at);
        fired
    }

    pub fn deadline(&self) -> Option<i64> {
        self.pending.values().map(|(at, _)| *at).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn set_delay(&mut self, delay_ms: u64) {
        self.delay_ms = duration_millis(delay_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_restarts_on_each_schedule() {
        let mut d = Debouncer::new(300);
        d.schedule("a", 0);
        d.schedule("b", 200);
        assert_eq!(d.poll(300), None);
        assert_eq!(d.poll(500), Some("b"));
        assert_eq!(d.poll(10_000), None);
    }

    #[test]
    fn oversized_delays_stay_in_the_future() {
        let mut d = Debouncer::new(u64::MAX);
        d.schedule("a", 5_000);
        assert_eq!(d.deadline(), Some(i64::MAX));
        assert_eq!(d.poll(10_000), None);

        let mut t = Throttle::new(u64::MAX);
        t.offer(1, 5_000);
        assert_eq!(t.poll(10_000), None);
    }

    #[test]
    fn throttle_keeps_window_start() {
        let mut t = Throttle::new(100);
        t.offer(1, 0);
        t.offer(2, 60);
        assert_eq!(t.deadline(), Some(100));
        assert_eq!(t.poll(99), None);
        assert_eq!(t.poll(100), Some(2));
        t.offer(3, 150);
        assert_eq!(t.deadline(), Some(250));
    }

    #[test]
    fn keyed_fields_fire_independently() {
        let mut k = KeyedDebouncer::new(500);
        k.schedule("email", 'e', 0);
        k.schedule("name", 'n', 100);
        k.schedule("email", 'E', 200);
        assert_eq!(k.deadline(), Some(600));
        assert_eq!(k.poll(600), vec![(600, 'n')]);
        assert_eq!(k.poll(700), vec![(700, 'E')]);
        assert!(k.is_empty());
    }
}
