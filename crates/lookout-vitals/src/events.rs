//! Raw inputs handed over by the host's performance hooks.

use serde::{Deserialize, Serialize};

use lookout_core::models::{LongTaskAttribution, VitalName};

/// Entry type a long-task timing must carry to be counted.
pub const LONG_TASK_ENTRY_TYPE: &str = "longtask";

/// A metric from the host's web-vitals library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebVitalMetric {
    pub name: VitalName,
    pub value: f64,
    #[serde(default)]
    pub delta: f64,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub navigation_type: String,
}

impl WebVitalMetric {
    pub fn new(name: VitalName, value: f64) -> Self {
        Self {
            name,
            value,
            delta: 0.0,
            id: String::new(),
            navigation_type: String::new(),
        }
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_navigation_type(mut self, navigation_type: impl Into<String>) -> Self {
        self.navigation_type = navigation_type.into();
        self
    }
}

/// One performance-observer entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LongTaskTiming {
    pub entry_type: String,
    pub name: String,
    pub duration: f64,
    pub start_time: f64,
    pub attribution: Vec<LongTaskAttribution>,
}

impl Default for LongTaskTiming {
    fn default() -> Self {
        Self {
            entry_type: LONG_TASK_ENTRY_TYPE.to_string(),
            name: String::new(),
            duration: 0.0,
            start_time: 0.0,
            attribution: Vec::new(),
        }
    }
}

impl LongTaskTiming {
    pub fn new(duration: f64, start_time: f64) -> Self {
        Self {
            duration,
            start_time,
            ..Self::default()
        }
    }

    pub fn with_attribution(mut self, attribution: LongTaskAttribution) -> Self {
        self.attribution.push(attribution);
        self
    }
}

/// Everything a vitals source can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "event", rename_all = "snake_case")]
pub enum VitalsEvent {
    WebVital(WebVitalMetric),
    LongTasks(Vec<LongTaskTiming>),
    /// An animation frame rendered at the clock's current time.
    AnimationFrame,
}
