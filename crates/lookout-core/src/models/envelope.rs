//! Wire shapes handed to transports.

use serde::{Deserialize, Serialize};

use super::record::Record;

/// Body of a batch delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchEnvelope {
    pub batch: Vec<Record>,
    pub batch_size: usize,
    /// Epoch millis at which the batch was cut.
    pub batch_timestamp: i64,
}

impl BatchEnvelope {
    pub fn new(batch: Vec<Record>, batch_timestamp: i64) -> Self {
        Self {
            batch_size: batch.len(),
            batch,
            batch_timestamp,
        }
    }
}

/// Either a single record or a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Batch(BatchEnvelope),
    Record(Box<Record>),
}

impl Payload {
    /// Number of records carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Batch(b) => b.batch.len(),
            Self::Record(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn records(&self) -> Vec<&Record> {
        match self {
            Self::Batch(b) => b.batch.iter().collect(),
            Self::Record(r) => vec![r.as_ref()],
        }
    }

    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// A POST handed off to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryRequest {
    pub url: String,
    pub payload: Payload,
}

impl DeliveryRequest {
    pub fn new(url: impl Into<String>, payload: Payload) -> Self {
        Self {
            url: url.into(),
            payload,
        }
    }
}

/// Snapshot of a collector's batch queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchQueueStatus {
    pub is_enabled: bool,
    pub queue_length: usize,
    pub batch_size: usize,
    pub batch_interval: u64,
    pub batch_report_url: Option<String>,
}

impl BatchQueueStatus {
    pub fn disabled() -> Self {
        Self {
            is_enabled: false,
            queue_length: 0,
            batch_size: 0,
            batch_interval: 0,
            batch_report_url: None,
        }
    }
}
