pub mod clock;
pub mod event_source;
pub mod heap_inspector;
pub mod page_context;
pub mod random;
pub mod reporter;
pub mod transport;

pub use clock::{duration_millis, IClock, ManualClock, SystemClock};
pub use event_source::{IEventSource, QueuedEventSource};
pub use heap_inspector::{HeapUsage, IHeapInspector, ScriptedHeap};
pub use page_context::{IPageContext, StaticPageContext};
pub use random::{FixedRandom, IRandom, ThreadRandom};
pub use reporter::ICustomReporter;
pub use transport::{IBeaconTransport, ITransport};
