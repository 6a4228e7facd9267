// src/domain/errors.rs
use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("validation error: {0}")]
    Validation(String),
    /// Zero rows matched an `(id, author_id)` predicate. Deliberately carries
    /// no hint about whether the article exists for some other author.
    #[error("not found: {0}")]
    OwnershipOrNotFound(String),
    #[error("persistence error: {0}")]
    Persistence(String),
    /// The draft and live stores disagree in a way a single transaction
    /// should have made impossible.
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),
    #[error("deadline exceeded: {0}")]
    DeadlineExceeded(String),
}

impl DomainError {
    pub fn article_not_found() -> Self {
        Self::OwnershipOrNotFound("article not found".into())
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::OwnershipOrNotFound(_))
    }
}
