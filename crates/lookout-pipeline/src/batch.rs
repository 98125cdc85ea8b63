//! Size- and deadline-triggered batch queue.
//!
//! Timers are modelled as a single optional deadline that the owner polls
//! with the current time, so at most one timer is ever armed.

use std::fmt;

use lookout_core::traits::duration_millis;

/// What caused a flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushTrigger {
    /// The queue reached its batch size.
    Size,
    /// The armed deadline passed.
    Interval,
    /// The page became hidden.
    Hidden,
    /// The host asked for it.
    Manual,
    /// The page is unloading; delivery goes through the beacon.
    Unload,
    /// Settings changed and the old queue is drained first.
    Reconfigure,
}

impl FlushTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Size => "size",
            Self::Interval => "interval",
            Self::Hidden => "hidden",
            Self::Manual => "manual",
            Self::Unload => "unload",
            Self::Reconfigure => "reconfigure",
        }
    }
}

impl fmt::Display for FlushTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// FIFO of report-eligible items.
///
/// Invariant: after `drain`, the queue is empty and no deadline is armed.
#[derive(Debug, Clone)]
pub struct BatchQueue<T> {
    items: Vec<T>,
    batch_size: usize,
    interval_ms: u64,
    deadline: Option<i64>,
}

impl<T> BatchQueue<T> {
    pub fn new(batch_size: usize, interval_ms: u64) -> Self {
        Self {
            items: Vec::new(),
            batch_size: batch_size.max(1),
            interval_ms,
            deadline: None,
        }
    }

    /// Append an item. Returns `Some(FlushTrigger::Size)` when the queue is
    /// now due for an immediate flush; otherwise arms the deadline if none is
    /// armed yet.
    pub fn enqueue(&mut self, item: T, now: i64) -> Option<FlushTrigger> {
        self.items.push(item);
        if self.items.len() >= self.batch_size {
            return Some(FlushTrigger::Size);
        }
        if self.deadline.is_none() {
            self.deadline = Some(now.saturating_add(duration_millis(self.interval_ms)));
        }
        None
    }

    /// Check the deadline. An expired deadline over an empty queue is simply
    /// disarmed.
    pub fn poll(&mut self, now: i64) -> Option<FlushTrigger> {
        match self.deadline {
            Some(at) if now >= at => {
                if self.items.is_empty() {
                    self.deadline = None;
                    None
                } else {
                    Some(FlushTrigger::Interval)
                }
            }
            _ => None,
        }
    }

    /// Take every queued item and cancel the deadline.
    pub fn drain(&mut self) -> Vec<T> {
        self.deadline = None;
        std::mem::take(&mut self.items)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn deadline(&self) -> Option<i64> {
        self.deadline
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Apply new limits. Queued items are kept; callers drain first when the
    /// destination changes.
    pub fn reconfigure(&mut self, batch_size: usize, interval_ms: u64) {
        self.batch_size = batch_size.max(1);
        self.interval_ms = interval_ms;
    }
}
