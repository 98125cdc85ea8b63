//! # lookout-core
//!
//! Foundation crate for the Lookout telemetry collectors.
//! Defines records, capability traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod patterns;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::LookoutConfig;
pub use errors::{LookoutError, LookoutResult};
pub use models::{Record, RecordDetail, RecordKind, Severity};
pub use patterns::IgnorePattern;
