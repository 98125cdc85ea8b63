/// Delivery errors raised by transports.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network error: {reason}")]
    NetworkError { reason: String },

    #[error("endpoint {url} answered HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("transport `{transport}` is not available: {reason}")]
    Unavailable { transport: String, reason: String },

    #[error("beacon rejected by host for {url}")]
    BeaconRejected { url: String },
}
