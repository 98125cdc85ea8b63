use std::collections::VecDeque;
use std::sync::Mutex;

/// Point-in-time heap figures in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapUsage {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub limit_bytes: u64,
}

impl HeapUsage {
    /// Used heap as a percentage of the limit. Zero when the limit is unknown.
    pub fn usage_percent(&self) -> f64 {
        if self.limit_bytes == 0 {
            return 0.0;
        }
        self.used_bytes as f64 / self.limit_bytes as f64 * 100.0
    }
}

/// Heap introspection. Hosts without a heap API return `None`.
pub trait IHeapInspector: Send + Sync {
    fn sample(&self) -> Option<HeapUsage>;
}

/// Replays a fixed series of samples; repeats the last one when exhausted.
#[derive(Debug, Default)]
pub struct ScriptedHeap {
    samples: Mutex<VecDeque<HeapUsage>>,
    last: Mutex<Option<HeapUsage>>,
}

impl ScriptedHeap {
    pub fn new(samples: impl IntoIterator<Item = HeapUsage>) -> Self {
        Self {
            samples: Mutex::new(samples.into_iter().collect()),
            last: Mutex::new(None),
        }
    }

    /// Series with a fixed limit and total, varying only the used bytes.
    pub fn from_used(used: impl IntoIterator<Item = u64>, limit_bytes: u64) -> Self {
        Self::new(used.into_iter().map(|used_bytes| HeapUsage {
            used_bytes,
            total_bytes: used_bytes,
            limit_bytes,
        }))
    }

    pub fn push(&self, usage: HeapUsage) {
        if let Ok(mut q) = self.samples.lock() {
            q.push_back(usage);
        }
    }
}

impl IHeapInspector for ScriptedHeap {
    fn sample(&self) -> Option<HeapUsage> {
        let next = self.samples.lock().ok()?.pop_front();
        let mut last = self.last.lock().ok()?;
        if let Some(usage) = next {
            *last = Some(usage);
        }
        *last
    }
}
