//! # lookout-transport
//!
//! Implementations of [`ITransport`](lookout_core::traits::ITransport) and
//! [`IBeaconTransport`](lookout_core::traits::IBeaconTransport).
//!
//! - [`RecordingTransport`] / [`RecordingBeacon`]: in-memory capture for tests
//!   and hosts that ship payloads themselves.
//! - [`NoopTransport`] / [`NoopBeacon`]: discard everything.
//! - `HttpTransport` / `HttpBeacon` (feature `http`): reqwest-backed POSTs.

pub mod noop;
pub mod protocol;
pub mod recording;

#[cfg(feature = "http")]
pub mod http;

pub use noop::{NoopBeacon, NoopTransport};
pub use protocol::{decode_batch, decode_payload, encode_payload, JSON_CONTENT_TYPE};
pub use recording::{BeaconCall, RecordingBeacon, RecordingTransport};

#[cfg(feature = "http")]
pub use http::{HttpBeacon, HttpTransport, HttpTransportConfig};
