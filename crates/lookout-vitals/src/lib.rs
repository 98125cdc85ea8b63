//! # lookout-vitals
//!
//! The web-vitals collector. A [`VitalsMonitor`] bridges core vitals from
//! the host and runs four performance sub-collectors:
//!
//! - an FPS sampler over a fixed window;
//! - a long-task observer;
//! - a heap-growth leak heuristic;
//! - a general heap monitor with threshold alerts.

pub mod events;
pub mod fps;
pub mod long_task;
pub mod memory;
pub mod memory_leak;
pub mod monitor;
pub mod rating;
pub mod sampler;

pub use events::{LongTaskTiming, VitalsEvent, WebVitalMetric};
pub use long_task::LongTaskReport;
pub use memory::MemoryMonitorStats;
pub use memory_leak::MemoryLeakStats;
pub use monitor::{VitalsMonitor, CORE_VITALS, RECENT_VITALS};
pub use rating::VitalDraft;
pub use sampler::SamplerStep;
