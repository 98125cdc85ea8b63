//! Assemble a [`CollectorEnv`] from defaults plus host overrides.

use std::sync::Arc;

use lookout_core::traits::{
    IBeaconTransport, IClock, IHeapInspector, IPageContext, IRandom, ITransport, SystemClock,
    ThreadRandom,
};
use lookout_pipeline::CollectorEnv;
use lookout_transport::{NoopBeacon, NoopTransport};

#[cfg(feature = "http")]
use lookout_core::errors::LookoutResult;
#[cfg(feature = "http")]
use lookout_transport::{HttpBeacon, HttpTransport, HttpTransportConfig};

/// Builder for the capabilities every monitor runs against.
///
/// Starts from the wall clock, thread-local randomness and transports that
/// discard everything. Only the page context has no default.
pub struct EnvBuilder {
    clock: Arc<dyn IClock>,
    page: Arc<dyn IPageContext>,
    random: Arc<dyn IRandom>,
    transport: Arc<dyn ITransport>,
    beacon: Arc<dyn IBeaconTransport>,
    heap: Option<Arc<dyn IHeapInspector>>,
}

impl EnvBuilder {
    pub fn new(page: Arc<dyn IPageContext>) -> Self {
        Self {
            clock: Arc::new(SystemClock),
            page,
            random: Arc::new(ThreadRandom),
            transport: Arc::new(NoopTransport),
            beacon: Arc::new(NoopBeacon),
            heap: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn IClock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn random(mut self, random: Arc<dyn IRandom>) -> Self {
        self.random = random;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn ITransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn beacon(mut self, beacon: Arc<dyn IBeaconTransport>) -> Self {
        self.beacon = beacon;
        self
    }

    pub fn heap(mut self, heap: Arc<dyn IHeapInspector>) -> Self {
        self.heap = Some(heap);
        self
    }

    /// POST through reqwest. Must be called inside a tokio runtime.
    #[cfg(feature = "http")]
    pub fn http(self, config: HttpTransportConfig) -> LookoutResult<Self> {
        let transport = HttpTransport::new(config.clone())?;
        Ok(self
            .transport(Arc::new(transport))
            .beacon(Arc::new(HttpBeacon::new(config))))
    }

    pub fn build(self) -> CollectorEnv {
        let env = CollectorEnv::new(
            self.clock,
            self.page,
            self.random,
            self.transport,
            self.beacon,
        );
        match self.heap {
            Some(heap) => env.with_heap(heap),
            None => env,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookout_core::traits::{ManualClock, ScriptedHeap, StaticPageContext};

    fn page() -> Arc<dyn IPageContext> {
        Arc::new(StaticPageContext::new("https://app.test/", "test-agent"))
    }

    #[test]
    fn defaults_discard_and_have_no_heap() {
        let env = EnvBuilder::new(page()).build();
        assert!(env.heap.is_none());
        assert_eq!(env.transport.name(), "noop");
    }

    #[test]
    fn overrides_are_kept() {
        let clock = ManualClock::new(42);
        let env = EnvBuilder::new(page())
            .clock(Arc::new(clock))
            .heap(Arc::new(ScriptedHeap::from_used([1], 10)))
            .build();
        assert_eq!(env.now(), 42);
        assert!(env.heap.is_some());
    }
}
