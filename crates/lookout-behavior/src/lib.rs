//! # lookout-behavior
//!
//! The user-behavior collector. DOM-level events are debounced or throttled
//! on deadline timers, turned into behavior records, and sent through the
//! shared collector pipeline. The collector also owns the visit session and
//! emits `session_start` / `session_end` records around it.

pub mod capture;
pub mod events;
pub mod monitor;
pub mod timers;

pub use events::{
    BehaviorEvent, ClickEvent, ElementInfo, ElementRect, FocusEvent, InputEvent, NavigationEvent,
    ResizeEvent, ScrollEvent,
};
pub use monitor::{BehaviorMonitor, RECENT_BEHAVIORS};
pub use timers::{Debouncer, KeyedDebouncer, Throttle};
