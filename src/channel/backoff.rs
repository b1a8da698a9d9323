//! Reconnection scheduling: exponential backoff and timer fencing.

use std::time::Duration;

/// Pure backoff schedule: attempt count to retry delay.
///
/// The delay doubles per attempt from `base` up to `cap`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    base: Duration,
    cap: Duration,
}

impl ReconnectPolicy {
    /// Create a policy with a custom base delay and cap.
    pub fn new(base: Duration, cap: Duration) -> Self {
        Self { base, cap }
    }

    /// Delay before the retry for the given zero-based attempt count:
    /// `min(base * 2^attempt, cap)`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = self.base.as_millis() as u64;
        let factor = 2u64.saturating_pow(attempt.min(31));
        let delay_ms = base_ms.saturating_mul(factor).min(self.cap.as_millis() as u64);
        Duration::from_millis(delay_ms)
    }
}

impl Default for ReconnectPolicy {
    /// 1 second base, 30 second cap.
    fn default() -> Self {
        Self {
            base: Duration::from_millis(1000),
            cap: Duration::from_millis(30_000),
        }
    }
}

/// Target captured when a reconnect timer is scheduled.
///
/// When the timer fires, the channel compares this against its current
/// target and silently discards the retry on mismatch, so a slow backoff
/// timer cannot resurrect a connection to a session the user has left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectContext {
    pub project_id: String,
    pub session_id: String,
    /// Attempt count at scheduling time (for logging).
    pub attempt: u32,
}

impl ReconnectContext {
    /// Whether this context still refers to the given target.
    pub fn matches(&self, project_id: &str, session_id: &str) -> bool {
        self.project_id == project_id && self.session_id == session_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(8000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(16_000));
    }

    #[test]
    fn test_cap_applies() {
        let policy = ReconnectPolicy::default();
        // 1000 * 2^5 = 32000, capped at 30000
        assert_eq!(policy.delay_for(5), Duration::from_millis(30_000));
        assert_eq!(policy.delay_for(12), Duration::from_millis(30_000));
    }

    #[test]
    fn test_huge_attempt_does_not_overflow() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay_for(u32::MAX), Duration::from_millis(30_000));
    }

    #[test]
    fn test_custom_policy() {
        let policy = ReconnectPolicy::new(Duration::from_millis(5), Duration::from_millis(40));
        assert_eq!(policy.delay_for(0), Duration::from_millis(5));
        assert_eq!(policy.delay_for(3), Duration::from_millis(40));
    }

    #[test]
    fn test_context_matches() {
        let ctx = ReconnectContext {
            project_id: "p1".to_string(),
            session_id: "s1".to_string(),
            attempt: 2,
        };
        assert!(ctx.matches("p1", "s1"));
        assert!(!ctx.matches("p1", "s2"));
        assert!(!ctx.matches("p2", "s1"));
    }
}
