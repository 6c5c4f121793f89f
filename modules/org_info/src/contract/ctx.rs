use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Per-call operation context: an optional deadline plus a cancellation token.
///
/// Every store-facing operation runs under one of these. When the deadline
/// passes or the token is cancelled the in-flight store call is dropped and the
/// operation fails with a store-unavailable error.
#[derive(Debug, Clone)]
pub struct OpCtx {
    deadline: Option<Instant>,
    cancel: CancellationToken,
}

impl Default for OpCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl OpCtx {
    /// No deadline, fresh token.
    pub fn new() -> Self {
        Self {
            deadline: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: CancellationToken::new(),
        }
    }

    /// Attach an externally owned cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn timeout_ctx_expires_after_deadline() {
        let ctx = OpCtx::with_timeout(Duration::from_millis(50));
        assert!(!ctx.is_expired());
        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(ctx.is_expired());
    }

    #[test]
    fn external_token_is_shared() {
        let token = CancellationToken::new();
        let ctx = OpCtx::new().with_cancellation(token.clone());
        assert!(!ctx.is_cancelled());
        token.cancel();
        assert!(ctx.is_cancelled());
        assert!(ctx.deadline().is_none());
    }
}
