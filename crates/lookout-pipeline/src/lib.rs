//! # lookout-pipeline
//!
//! The shared collector pipeline:
//! normalize → policy filter → ring buffer → batch queue → transport.
//!
//! Each collector crate wraps one [`Collector`] and feeds it [`RecordDraft`]s
//! built from host events.

pub mod batch;
pub mod collector;
pub mod delivery;
pub mod normalizer;
pub mod policy;
pub mod ring_buffer;
pub mod session;
pub mod stats;
pub mod tracing_setup;

pub use batch::{BatchQueue, FlushTrigger};
pub use collector::{CollectOutcome, Collector, CollectorEnv, CollectorSettings};
pub use delivery::BatchReporter;
pub use normalizer::{Normalizer, RecordDraft};
pub use policy::{Decision, PolicyFilter, RejectReason};
pub use ring_buffer::RingBuffer;
pub use session::{SessionTracker, TimeoutPolicy};
pub use stats::compute_stats;
