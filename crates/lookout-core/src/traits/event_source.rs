use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Produces raw host events for a collector to consume.
pub trait IEventSource<E>: Send {
    /// Take every event produced since the last drain, oldest first.
    fn drain(&mut self) -> Vec<E>;
}

/// A FIFO that host hooks push into and a collector drains. Clones share the
/// queue.
#[derive(Debug)]
pub struct QueuedEventSource<E> {
    queue: Arc<Mutex<VecDeque<E>>>,
}

impl<E> Clone for QueuedEventSource<E> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<E> Default for QueuedEventSource<E> {
    fn default() -> Self {
        Self {
            queue: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

impl<E> QueuedEventSource<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: E) {
        match self.queue.lock() {
            Ok(mut q) => q.push_back(event),
            Err(poisoned) => poisoned.into_inner().push_back(event),
        }
    }

    pub fn len(&self) -> usize {
        self.queue.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Send> IEventSource<E> for QueuedEventSource<E> {
    fn drain(&mut self) -> Vec<E> {
        match self.queue.lock() {
            Ok(mut q) => q.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        }
    }
}
