use lookout_pipeline::RecordDraft;

/// Result of polling a periodic heap sampler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SamplerStep {
    /// Records produced by this poll, in emission order.
    pub drafts: Vec<RecordDraft>,
    /// The sampler reached its duration ceiling and should be stopped.
    pub finished: bool,
}

impl SamplerStep {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn sampled(drafts: Vec<RecordDraft>) -> Self {
        Self {
            drafts,
            finished: false,
        }
    }

    pub fn finished(drafts: Vec<RecordDraft>) -> Self {
        Self {
            drafts,
            finished: true,
        }
    }
}
