//! Run limits
//!
//! Optional bounds on a single paginator call: a deadline, a cooperative
//! cancellation flag and a cap on retrieval rounds. All are checked before
//! each round; none of them interrupt a retrieval already in flight.

use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// Shared flag used to cancel in-progress paginator calls
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; every clone observes it
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Bounds applied to every call of a paginator
#[derive(Debug, Clone, Default)]
pub struct RunLimits {
    /// Maximum retrieval rounds per call
    pub max_rounds: Option<usize>,
    /// Wall-clock budget per call
    pub timeout: Option<Duration>,
    /// Cancellation flag
    pub cancel: Option<CancelToken>,
}

impl RunLimits {
    /// Create unbounded limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the round cap
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Set the per-call timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the cancellation token
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Start the clock for one call
    pub(crate) fn start(&self) -> RunGuard<'_> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);
        RunGuard {
            limits: self,
            deadline,
        }
    }
}

/// Limits bound to one in-progress call
#[derive(Debug)]
pub(crate) struct RunGuard<'a> {
    limits: &'a RunLimits,
    deadline: Option<Instant>,
}

impl RunGuard<'_> {
    /// Deadline handed to delegates
    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Check whether round `round` (0-based) may start
    pub(crate) fn check(&self, round: usize) -> Result<()> {
        if let Some(token) = &self.limits.cancel {
            if token.is_cancelled() {
                warn!(round, "Pagination cancelled");
                return Err(Error::Cancelled);
            }
        }

        if let Some(max_rounds) = self.limits.max_rounds {
            if round >= max_rounds {
                warn!(round, max_rounds, "Retrieval round limit reached");
                return Err(Error::RoundLimitExceeded { max_rounds });
            }
        }

        if let (Some(deadline), Some(timeout)) = (self.deadline, self.limits.timeout) {
            if Instant::now() >= deadline {
                let timeout_ms = timeout.as_millis() as u64;
                warn!(round, timeout_ms, "Pagination deadline exceeded");
                return Err(Error::DeadlineExceeded { timeout_ms });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_token_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_unbounded_limits_always_pass() {
        let limits = RunLimits::new();
        let guard = limits.start();
        assert!(guard.deadline().is_none());
        assert!(guard.check(0).is_ok());
        assert!(guard.check(10_000).is_ok());
    }

    #[test]
    fn test_round_cap() {
        let limits = RunLimits::new().with_max_rounds(2);
        let guard = limits.start();
        assert!(guard.check(0).is_ok());
        assert!(guard.check(1).is_ok());
        assert!(matches!(
            guard.check(2),
            Err(Error::RoundLimitExceeded { max_rounds: 2 })
        ));
    }

    #[test]
    fn test_cancelled_token_fails_check() {
        let token = CancelToken::new();
        let limits = RunLimits::new().with_cancel_token(token.clone());
        let guard = limits.start();
        assert!(guard.check(0).is_ok());

        token.cancel();
        assert!(matches!(guard.check(1), Err(Error::Cancelled)));
    }

    #[test]
    fn test_expired_deadline_fails_check() {
        let limits = RunLimits::new().with_timeout(Duration::from_millis(1));
        let guard = limits.start();
        assert!(guard.deadline().is_some());

        std::thread::sleep(Duration::from_millis(5));
        assert!(matches!(
            guard.check(1),
            Err(Error::DeadlineExceeded { timeout_ms: 1 })
        ));
    }
}
