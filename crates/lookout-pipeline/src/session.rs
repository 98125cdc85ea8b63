//! Session ownership and the idle-timeout state machine.
//!
//! A session is ACTIVE until a periodic check finds the idle gap above the
//! timeout; it is then EXPIRED and immediately replaced by a fresh ACTIVE
//! session. The check itself is a deadline polled by [`SessionTracker::poll_expired`].

use lookout_core::models::Session;

use crate::normalizer::new_session_id;

/// Policy of the periodic idle check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    pub timeout_ms: i64,
    pub check_interval_ms: i64,
}

#[derive(Debug, Clone)]
pub struct SessionTracker {
    session: Session,
    timeout: Option<TimeoutPolicy>,
    next_check_at: Option<i64>,
}

impl SessionTracker {
    /// Start a session. A non-empty `seed` becomes the first session id.
    pub fn new(seed: Option<String>, now: i64, timeout: Option<TimeoutPolicy>) -> Self {
        let id = seed
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| new_session_id(now));
        Self {
            session: Session::new(id, now),
            next_check_at: timeout.map(|t| now + t.check_interval_ms.max(1)),
            timeout,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    pub fn touch(&mut self, now: i64) {
        self.session.touch(now);
    }

    pub fn next_check_at(&self) -> Option<i64> {
        self.next_check_at
    }

    /// Run the idle check if it is due. Returns the expired session without
    /// rotating so the caller can emit its end record first; call
    /// [`rotate`](Self::rotate) afterwards.
    pub fn poll_expired(&mut self, now: i64) -> Option<Session> {
        let policy = self.timeout?;
        let due = self.next_check_at?;
        if now < due {
            return None;
        }
        // Catch up on missed checks without firing more than once.
        let interval = policy.check_interval_ms.max(1);
        let missed = (now - due) / interval;
        self.next_check_at = Some(due + (missed + 1) * interval);

        if self.session.idle_ms(now) > policy.timeout_ms {
            Some(self.session.clone())
        } else {
            None
        }
    }

    /// Replace the current session with a fresh one started at `now`.
    pub fn rotate(&mut self, now: i64) -> Session {
        let next = Session::new(new_session_id(now), now);
        std::mem::replace(&mut self.session, next)
    }

    /// Stop running idle checks.
    pub fn cancel_checks(&mut self) {
        self.next_check_at = None;
    }

    pub fn set_timeout(&mut self, timeout: Option<TimeoutPolicy>, now: i64) {
        self.timeout = timeout;
        self.next_check_at = timeout.map(|t| now + t.check_interval_ms.max(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY: TimeoutPolicy = TimeoutPolicy {
        timeout_ms: 1_000,
        check_interval_ms: 100,
    };

    #[test]
    fn seed_becomes_first_session_id() {
        let tracker = SessionTracker::new(Some("seeded".into()), 0, None);
        assert_eq!(tracker.session_id(), "seeded");
    }

    #[test]
    fn generated_ids_have_session_prefix() {
        let tracker = SessionTracker::new(None, 1_234, None);
        let id = tracker.session_id();
        assert!(id.starts_with("session_1234_"));
        assert_eq!(id.len(), "session_1234_".len() + 9);
    }

    #[test]
    fn no_checks_before_due() {
        let mut tracker = SessionTracker::new(None, 0, Some(POLICY));
        assert!(tracker.poll_expired(50).is_none());
    }

    #[test]
    fn expires_once_after_idle_gap() {
        let mut tracker = SessionTracker::new(None, 0, Some(POLICY));
        let first = tracker.session_id().to_string();
        let expired = tracker.poll_expired(1_100).expect("expired");
        assert_eq!(expired.session_id, first);
        tracker.rotate(1_100);
        assert_ne!(tracker.session_id(), first);
        assert!(tracker.poll_expired(1_200).is_none());
    }

    #[test]
    fn activity_keeps_session_alive() {
        let mut tracker = SessionTracker::new(None, 0, Some(POLICY));
        tracker.touch(900);
        assert!(tracker.poll_expired(1_500).is_none());
    }
}
