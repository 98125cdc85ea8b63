//! Raw failures as the host observes them, before normalization.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uncaught runtime error from the global error handler.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScriptError {
    pub message: String,
    pub filename: Option<String>,
    pub lineno: Option<u32>,
    pub colno: Option<u32>,
    pub stack: Option<String>,
}

/// The value a promise was rejected with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RejectionReason {
    /// An error object.
    Error {
        message: String,
        #[serde(default)]
        stack: Option<String>,
    },
    /// Any other value: a string, an object, or nothing at all.
    Value(Value),
}

/// A script, stylesheet, or image that failed to load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceFailure {
    /// Element node name, e.g. `IMG`.
    pub node_name: String,
    pub src: Option<String>,
    pub href: Option<String>,
}

/// Error raised inside a UI component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentFailure {
    pub message: String,
    pub stack: Option<String>,
    pub component_name: Option<String>,
    /// Lifecycle hook or render-phase info supplied by the framework.
    pub info: Option<String>,
    pub props: Option<Value>,
    pub route: Option<String>,
    pub route_params: Option<Value>,
    pub route_query: Option<Value>,
}

/// Request or response failure reported by the host's HTTP client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpFailure {
    pub message: String,
    pub url: Option<String>,
    pub method: Option<String>,
    pub data: Option<Value>,
    pub status: Option<u16>,
    pub response_data: Option<Value>,
    /// Epoch millis at which the request was sent.
    pub started_at: Option<i64>,
    /// The client aborted on its own timeout.
    pub timed_out: bool,
}

/// Everything an error event source can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum ErrorEvent {
    Script(ScriptError),
    Rejection(RejectionReason),
    Resource(ResourceFailure),
    Component(ComponentFailure),
    HttpRequest(HttpFailure),
    HttpResponse(HttpFailure),
}
