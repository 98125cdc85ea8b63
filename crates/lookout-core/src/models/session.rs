use serde::{Deserialize, Serialize};

/// A logical visit owned by one collector.
///
/// Invariant: `last_activity_at >= started_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub started_at: i64,
    pub last_activity_at: i64,
}

impl Session {
    pub fn new(session_id: String, now: i64) -> Self {
        Self {
            session_id,
            started_at: now,
            last_activity_at: now,
        }
    }

    /// Record activity. Timestamps earlier than the session start are
    /// clamped so the invariant holds under clock skew.
    pub fn touch(&mut self, now: i64) {
        self.last_activity_at = now.max(self.started_at).max(self.last_activity_at);
    }

    pub fn idle_ms(&self, now: i64) -> i64 {
        (now - self.last_activity_at).max(0)
    }

    pub fn duration_ms(&self, now: i64) -> i64 {
        (now - self.started_at).max(0)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Timeout,
    PageUnload,
}

impl EndReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::PageUnload => "page_unload",
        }
    }
}
