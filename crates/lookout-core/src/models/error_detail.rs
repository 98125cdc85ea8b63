use serde::{Deserialize, Serialize};

/// Source of a captured error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    /// Uncaught runtime error from the global handler.
    Javascript,
    /// Error raised inside a UI component render or lifecycle hook.
    Component,
    /// Unhandled promise rejection.
    Promise,
    /// A script, stylesheet, or image failed to load.
    Resource,
    /// Request or response failure from the host's HTTP client.
    Ajax,
    /// Manually reported.
    Custom,
}

impl ErrorType {
    pub const ALL: [ErrorType; 6] = [
        Self::Javascript,
        Self::Component,
        Self::Promise,
        Self::Resource,
        Self::Ajax,
        Self::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Component => "component",
            Self::Promise => "promise",
            Self::Resource => "resource",
            Self::Ajax => "ajax",
            Self::Custom => "custom",
        }
    }

    /// Parse the lowercase wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }
}

/// Error-specific payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colno: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_params: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_query: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_data: Option<serde_json::Value>,
}

impl ErrorDetail {
    /// Empty detail of the given type.
    pub fn new(error_type: ErrorType) -> Self {
        Self {
            error_type,
            stack: None,
            filename: None,
            lineno: None,
            colno: None,
            component_name: None,
            component_stack: None,
            props_data: None,
            route: None,
            route_params: None,
            route_query: None,
            resource_type: None,
            resource_url: None,
            request_url: None,
            request_method: None,
            request_data: None,
            response_status: None,
            response_data: None,
        }
    }
}
