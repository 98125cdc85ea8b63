use serde::{Deserialize, Serialize};

/// Kind of user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BehaviorType {
    Click,
    Scroll,
    Input,
    Focus,
    Blur,
    Resize,
    Navigation,
    PageView,
    SessionStart,
    SessionEnd,
    Custom,
}

impl BehaviorType {
    pub const ALL: [BehaviorType; 11] = [
        Self::Click,
        Self::Scroll,
        Self::Input,
        Self::Focus,
        Self::Blur,
        Self::Resize,
        Self::Navigation,
        Self::PageView,
        Self::SessionStart,
        Self::SessionEnd,
        Self::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Scroll => "scroll",
            Self::Input => "input",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Resize => "resize",
            Self::Navigation => "navigation",
            Self::PageView => "page_view",
            Self::SessionStart => "session_start",
            Self::SessionEnd => "session_end",
            Self::Custom => "custom",
        }
    }
}

/// Behavior-specific payload: element, position, and page information.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorDetail {
    #[serde(rename = "type")]
    pub behavior_type: BehaviorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_y: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_src: Option<String>,

    /// Milliseconds since navigation start, two decimals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_load_time: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_route: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport_height: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_behavior_id: Option<String>,
}

impl Default for BehaviorType {
    fn default() -> Self {
        Self::Custom
    }
}

impl BehaviorDetail {
    pub fn new(behavior_type: BehaviorType) -> Self {
        Self {
            behavior_type,
            ..Default::default()
        }
    }
}
