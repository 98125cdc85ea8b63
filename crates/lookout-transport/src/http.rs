//! reqwest-backed transports. Compiled only with the `http` feature.
//!
//! [`HttpTransport`] posts on a tokio runtime and never blocks the caller.
//! [`HttpBeacon`] posts from a detached thread with a blocking client, so the
//! send outlives the collector that queued it.

use std::time::Duration;

use lookout_core::errors::{LookoutError, LookoutResult, TransportError};
use lookout_core::models::DeliveryRequest;
use lookout_core::traits::{IBeaconTransport, ITransport};
use tokio::runtime::Handle;

use crate::protocol::{encode_payload, JSON_CONTENT_TYPE};

#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: format!("lookout/{}", lookout_core::constants::VERSION),
        }
    }
}

fn net_err(reason: String) -> LookoutError {
    TransportError::NetworkError { reason }.into()
}

/// Fire-and-forget JSON POSTs on a tokio runtime.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    handle: Handle,
}

impl HttpTransport {
    /// Bind to the runtime the caller is running on.
    pub fn new(config: HttpTransportConfig) -> LookoutResult<Self> {
        let handle = Handle::try_current().map_err(|e| TransportError::Unavailable {
            transport: "http".into(),
            reason: e.to_string(),
        })?;
        Self::with_handle(config, handle)
    }

    pub fn with_handle(config: HttpTransportConfig, handle: Handle) -> LookoutResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .gzip(true)
            .build()
            .map_err(|e: reqwest::Error| net_err(e.to_string()))?;
        Ok(Self { client, handle })
    }

    /// POST one request and wait for the answer. Non-2xx is an error.
    pub async fn send(&self, request: DeliveryRequest) -> LookoutResult<()> {
        let body = encode_payload(&request.payload)?;
        let resp = self
            .client
            .post(&request.url)
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e: reqwest::Error| net_err(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(TransportError::HttpStatus {
                url: request.url,
                status: status.as_u16(),
            }
            .into())
        }
    }
}

impl ITransport for HttpTransport {
    fn dispatch(&self, request: DeliveryRequest) {
        let this = self.clone();
        self.handle.spawn(async move {
            let url = request.url.clone();
            let records = request.payload.len();
            match this.send(request).await {
                Ok(()) => tracing::debug!(%url, records, "http delivery accepted"),
                Err(e) => tracing::warn!(%url, records, error = %e, "http delivery failed"),
            }
        });
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Unload-time delivery over a detached thread.
#[derive(Debug, Clone, Default)]
pub struct HttpBeacon {
    config: HttpTransportConfig,
}

impl HttpBeacon {
    pub fn new(config: HttpTransportConfig) -> Self {
        Self { config }
    }

    fn post_blocking(config: &HttpTransportConfig, url: &str, body: Vec<u8>) -> LookoutResult<()> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e: reqwest::Error| net_err(e.to_string()))?;
        let resp = client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .map_err(|e: reqwest::Error| net_err(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(TransportError::HttpStatus {
                url: url.to_string(),
                status: resp.status().as_u16(),
            }
            .into())
        }
    }
}

impl IBeaconTransport for HttpBeacon {
    fn send_beacon(&self, url: &str, body: Vec<u8>) -> bool {
        let config = self.config.clone();
        let url = url.to_string();
        let spawned = std::thread::Builder::new()
            .name("lookout-beacon".into())
            .spawn(move || {
                if let Err(e) = Self::post_blocking(&config, &url, body) {
                    tracing::warn!(%url, error = %e, "beacon delivery failed");
                }
            });
        match spawned {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "could not start beacon thread");
                false
            }
        }
    }
}
