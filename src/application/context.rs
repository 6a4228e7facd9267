// src/application/context.rs
use crate::domain::errors::DomainError;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("deadline exceeded")]
pub struct DeadlineExceeded;

impl From<DeadlineExceeded> for DomainError {
    fn from(_: DeadlineExceeded) -> Self {
        Self::DeadlineExceeded("store call did not finish before the caller's deadline".into())
    }
}

/// Deadline carried by every blocking call into the repository.
///
/// Cancellation is dropping the returned future; the deadline only bounds how
/// long an awaited call may take. Detached background work never inherits a
/// request's context and builds its own with [`CallContext::with_timeout`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
}

impl CallContext {
    /// No deadline.
    pub const fn background() -> Self {
        Self { deadline: None }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
        }
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Runs `fut` to completion unless the deadline passes first.
    pub async fn bound<F>(&self, fut: F) -> Result<F::Output, DeadlineExceeded>
    where
        F: Future,
    {
        match self.deadline {
            None => Ok(fut.await),
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DeadlineExceeded),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_context_never_expires() {
        let ctx = CallContext::background();
        assert!(!ctx.is_expired());
        assert!(ctx.remaining().is_none());
        assert_eq!(ctx.bound(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn bound_reports_elapsed_deadline() {
        let ctx = CallContext::with_timeout(Duration::from_millis(10));
        let result = ctx
            .bound(tokio::time::sleep(Duration::from_secs(5)))
            .await;
        assert_eq!(result, Err(DeadlineExceeded));
        assert!(ctx.is_expired());
    }

    #[test]
    fn deadline_maps_into_domain_error() {
        let err: DomainError = DeadlineExceeded.into();
        assert!(matches!(err, DomainError::DeadlineExceeded(_)));
    }
}
