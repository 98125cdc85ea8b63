use crate::models::DeliveryRequest;

/// Ordinary delivery. `dispatch` hands the request off and returns; the
/// transport awaits the outcome itself and logs failures.
pub trait ITransport: Send + Sync {
    fn dispatch(&self, request: DeliveryRequest);

    /// Human-readable transport name.
    fn name(&self) -> &str;
}

/// Unload-time delivery. The send is enqueued synchronously and must survive
/// page teardown; the outcome is never observable. Returns whether the host
/// accepted the payload for sending.
pub trait IBeaconTransport: Send + Sync {
    fn send_beacon(&self, url: &str, body: Vec<u8>) -> bool;
}
