//! # lookout
//!
//! One handle over the three collectors. [`Lookout`] owns an
//! [`ErrorMonitor`], a [`BehaviorMonitor`] and a [`VitalsMonitor`] built
//! from a single [`LookoutConfig`] and fans the page lifecycle out to all
//! of them.
//!
//! Hosts feed events straight into the monitor they belong to
//! (`lookout.errors_mut().on_global_error(..)`) and either call
//! [`Lookout::tick`] themselves or, with the `driver` feature, hand the
//! handle to [`driver::spawn_driver`].

pub mod env;
pub mod runtime;

#[cfg(feature = "driver")]
pub mod driver;

pub use env::EnvBuilder;
pub use runtime::{Lookout, LookoutOptions, LookoutStats};

pub use lookout_behavior::BehaviorMonitor;
pub use lookout_core::config::LookoutConfig;
pub use lookout_core::errors::{LookoutError, LookoutResult};
pub use lookout_errors::ErrorMonitor;
pub use lookout_pipeline::tracing_setup::{init_tracing, init_tracing_with_filter};
pub use lookout_pipeline::{CollectOutcome, CollectorEnv};
pub use lookout_vitals::VitalsMonitor;
