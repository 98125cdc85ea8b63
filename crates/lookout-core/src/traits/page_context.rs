use std::sync::{Arc, RwLock};

/// Ambient page state read by the normalizer.
pub trait IPageContext: Send + Sync {
    fn page_url(&self) -> String;

    fn user_agent(&self) -> String;

    /// Milliseconds since navigation start (`performance.now()` in a browser).
    fn since_navigation_ms(&self) -> f64;

    fn title(&self) -> Option<String> {
        None
    }

    fn referrer(&self) -> Option<String> {
        None
    }

    /// Viewport width and height in CSS pixels.
    fn viewport(&self) -> Option<(f64, f64)> {
        None
    }
}

#[derive(Debug, Clone, Default)]
struct PageState {
    url: String,
    user_agent: String,
    title: Option<String>,
    referrer: Option<String>,
    viewport: Option<(f64, f64)>,
    navigation_start: i64,
}

/// Host-updated page context. Clones share state, so a host can keep a handle
/// and update the url on navigation.
#[derive(Debug, Clone, Default)]
pub struct StaticPageContext {
    state: Arc<RwLock<PageState>>,
    clock: Option<super::ManualClock>,
}

impl StaticPageContext {
    pub fn new(url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            state: Arc::new(RwLock::new(PageState {
                url: url.into(),
                user_agent: user_agent.into(),
                ..Default::default()
            })),
            clock: None,
        }
    }

    /// Derive `since_navigation_ms` from a manual clock.
    pub fn with_clock(mut self, clock: super::ManualClock) -> Self {
        use super::IClock;
        if let Ok(mut state) = self.state.write() {
            state.navigation_start = clock.now_millis();
        }
        self.clock = Some(clock);
        self
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.title = Some(title.into());
        }
        self
    }

    pub fn with_referrer(self, referrer: impl Into<String>) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.referrer = Some(referrer.into());
        }
        self
    }

    pub fn with_viewport(self, width: f64, height: f64) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.viewport = Some((width, height));
        }
        self
    }

    pub fn set_url(&self, url: impl Into<String>) {
        if let Ok(mut state) = self.state.write() {
            state.url = url.into();
        }
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        if let Ok(mut state) = self.state.write() {
            state.viewport = Some((width, height));
        }
    }

    fn read<T>(&self, f: impl FnOnce(&PageState) -> T) -> T {
        match self.state.read() {
            Ok(state) => f(&state),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}

impl IPageContext for StaticPageContext {
    fn page_url(&self) -> String {
        self.read(|s| s.url.clone())
    }

    fn user_agent(&self) -> String {
        self.read(|s| s.user_agent.clone())
    }

    fn since_navigation_ms(&self) -> f64 {
        use super::IClock;
        match &self.clock {
            Some(clock) => (clock.now_millis() - self.read(|s| s.navigation_start)) as f64,
            None => 0.0,
        }
    }

    fn title(&self) -> Option<String> {
        self.read(|s| s.title.clone())
    }

    fn referrer(&self) -> Option<String> {
        self.read(|s| s.referrer.clone())
    }

    fn viewport(&self) -> Option<(f64, f64)> {
        self.read(|s| s.viewport)
    }
}
