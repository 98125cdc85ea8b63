use lookout_core::models::DeliveryRequest;
use lookout_core::traits::{IBeaconTransport, ITransport};

/// Drops every request.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTransport;

impl ITransport for NoopTransport {
    fn dispatch(&self, request: DeliveryRequest) {
        tracing::trace!(url = %request.url, records = request.payload.len(), "noop transport discarded payload");
    }

    fn name(&self) -> &str {
        "noop"
    }
}

/// Refuses every beacon.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopBeacon;

impl IBeaconTransport for NoopBeacon {
    fn send_beacon(&self, _url: &str, _body: Vec<u8>) -> bool {
        false
    }
}
