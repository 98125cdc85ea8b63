use std::sync::{Arc, Mutex, MutexGuard};

use lookout_core::models::{BatchEnvelope, DeliveryRequest};
use lookout_core::traits::{IBeaconTransport, ITransport};

use crate::protocol::decode_batch;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Captures every dispatched request. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<DeliveryRequest>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> Vec<DeliveryRequest> {
        lock(&self.requests).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Total records across all captured payloads.
    pub fn record_count(&self) -> usize {
        lock(&self.requests).iter().map(|r| r.payload.len()).sum()
    }

    pub fn take(&self) -> Vec<DeliveryRequest> {
        std::mem::take(&mut *lock(&self.requests))
    }
}

impl ITransport for RecordingTransport {
    fn dispatch(&self, request: DeliveryRequest) {
        lock(&self.requests).push(request);
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// One captured beacon send.
#[derive(Debug, Clone, PartialEq)]
pub struct BeaconCall {
    pub url: String,
    pub body: Vec<u8>,
}

impl BeaconCall {
    pub fn batch(&self) -> Option<BatchEnvelope> {
        decode_batch(&self.body).ok()
    }
}

/// Captures beacon sends. Can be told to refuse payloads, like a browser
/// whose beacon quota is exhausted.
#[derive(Debug, Clone)]
pub struct RecordingBeacon {
    calls: Arc<Mutex<Vec<BeaconCall>>>,
    accept: bool,
}

impl Default for RecordingBeacon {
    fn default() -> Self {
        Self {
            calls: Arc::default(),
            accept: true,
        }
    }
}

impl RecordingBeacon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing() -> Self {
        Self {
            accept: false,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<BeaconCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl IBeaconTransport for RecordingBeacon {
    fn send_beacon(&self, url: &str, body: Vec<u8>) -> bool {
        lock(&self.calls).push(BeaconCall {
            url: url.to_string(),
            body,
        });
        self.accept
    }
}
