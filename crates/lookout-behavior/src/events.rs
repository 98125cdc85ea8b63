//! DOM-level events as the host observes them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementRect {
    pub width: f64,
    pub height: f64,
}

/// The element an event targeted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementInfo {
    pub tag_name: String,
    pub id: Option<String>,
    pub class_name: Option<String>,
    /// Form field name, for inputs.
    pub name: Option<String>,
    pub text: Option<String>,
    pub href: Option<String>,
    pub src: Option<String>,
    pub rect: Option<ElementRect>,
}

impl ElementInfo {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_rect(mut self, width: f64, height: f64) -> Self {
        self.rect = Some(ElementRect { width, height });
        self
    }

    /// Lowercased tag name.
    pub fn tag(&self) -> String {
        self.tag_name.to_ascii_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClickEvent {
    pub element: ElementInfo,
    pub client_x: f64,
    pub client_y: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

/// Window scroll position after a scroll.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollEvent {
    pub scroll_x: f64,
    pub scroll_y: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputEvent {
    pub element: ElementInfo,
    pub value: String,
}

impl InputEvent {
    /// Key the per-field debounce runs on: name, then id, then class.
    pub fn field_name(&self) -> String {
        [
            &self.element.name,
            &self.element.id,
            &self.element.class_name,
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .cloned()
        .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusEvent {
    pub element: ElementInfo,
}

/// New viewport size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeEvent {
    pub width: f64,
    pub height: f64,
}

/// Client-side route change.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationEvent {
    pub from: Option<String>,
    pub to: String,
}

/// Everything a behavior event source can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum BehaviorEvent {
    Click(ClickEvent),
    Scroll(ScrollEvent),
    Input(InputEvent),
    Focus(FocusEvent),
    Blur(FocusEvent),
    Resize(ResizeEvent),
    Navigation(NavigationEvent),
}
