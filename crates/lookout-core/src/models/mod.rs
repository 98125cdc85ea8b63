pub mod behavior_detail;
pub mod envelope;
pub mod error_detail;
pub mod record;
pub mod session;
pub mod severity;
pub mod stats;
pub mod vital_detail;

pub use behavior_detail::{BehaviorDetail, BehaviorType};
pub use envelope::{BatchEnvelope, BatchQueueStatus, DeliveryRequest, Payload};
pub use error_detail::{ErrorDetail, ErrorType};
pub use record::{Record, RecordDetail, RecordKind};
pub use session::{EndReason, Session};
pub use severity::Severity;
pub use stats::RecordStats;
pub use vital_detail::{
    FpsStats, LongTaskAttribution, LongTaskEntry, LongTaskStats, LongTaskSummary,
    MemoryLeakSample, MemoryLeakSummary, MemorySample, MemoryStats, MemorySummary, MemoryTrend,
    Rating, VitalAttachment, VitalDetail, VitalName,
};
