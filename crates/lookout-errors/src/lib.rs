//! # lookout-errors
//!
//! The error collector. Host hooks hand raw failures to an [`ErrorMonitor`],
//! which turns them into error records and runs them through the shared
//! collector pipeline.

pub mod capture;
pub mod events;
pub mod monitor;

pub use events::{
    ComponentFailure, ErrorEvent, HttpFailure, RejectionReason, ResourceFailure, ScriptError,
};
pub use monitor::{ErrorMonitor, RECENT_ERRORS};
