// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(DomainError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("resource not found: {0}")]
    NotFound(String),
}

/// Rejected input is reported as `Validation`; every other domain failure is
/// carried through unchanged.
impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => Self::Validation(msg),
            other => Self::Domain(other),
        }
    }
}

impl ApplicationError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// True for both a missing article and one owned by somebody else.
    pub const fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Domain(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Draft and live stores diverged; callers should alert rather than retry.
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::Domain(DomainError::IntegrityViolation(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_validation_becomes_application_validation() {
        let err = ApplicationError::from(DomainError::Validation("title cannot be empty".into()));
        assert!(matches!(err, ApplicationError::Validation(_)));
        assert!(!err.is_not_found());
    }

    #[test]
    fn integrity_violation_is_reported_distinctly() {
        let err = ApplicationError::from(DomainError::IntegrityViolation("two live rows".into()));
        assert!(err.is_integrity_violation());
        assert!(!err.is_not_found());

        let missing = ApplicationError::from(DomainError::article_not_found());
        assert!(missing.is_not_found());
        assert!(!missing.is_integrity_violation());
    }
}
