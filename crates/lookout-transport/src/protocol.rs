//! Wire encoding shared by every transport. Bodies are plain JSON.

use lookout_core::errors::LookoutResult;
use lookout_core::models::{BatchEnvelope, Payload};

pub const JSON_CONTENT_TYPE: &str = "application/json";

pub fn encode_payload(payload: &Payload) -> LookoutResult<Vec<u8>> {
    Ok(payload.to_json()?)
}

/// Parse a body produced by [`encode_payload`].
pub fn decode_payload(body: &[u8]) -> LookoutResult<Payload> {
    Ok(serde_json::from_slice(body)?)
}

/// Parse a batch body, failing on single-record bodies.
pub fn decode_batch(body: &[u8]) -> LookoutResult<BatchEnvelope> {
    Ok(serde_json::from_slice(body)?)
}
