// src/domain/article/status.rs
use crate::domain::errors::{DomainError, DomainResult};
use std::fmt;

/// Publication state of an article. The numeric codes are persisted in both
/// stores and in cached entries, so they must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArticleStatus {
    /// Private draft that has never been shown publicly, or a draft edited
    /// after publication whose changes are not yet live.
    Unpublished,
    Published,
    /// Withdrawn: previously published, now hidden from public reads.
    Private,
}

impl ArticleStatus {
    pub const fn code(self) -> i16 {
        match self {
            Self::Unpublished => 1,
            Self::Published => 2,
            Self::Private => 3,
        }
    }

    pub fn from_code(code: i16) -> DomainResult<Self> {
        match code {
            1 => Ok(Self::Unpublished),
            2 => Ok(Self::Published),
            3 => Ok(Self::Private),
            other => Err(DomainError::Validation(format!(
                "unknown article status code: {other}"
            ))),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unpublished => "unpublished",
            Self::Published => "published",
            Self::Private => "private",
        }
    }

    pub const fn is_public(self) -> bool {
        matches!(self, Self::Published)
    }
}

impl fmt::Display for ArticleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i16> for ArticleStatus {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::from_code(value)
    }
}

impl From<ArticleStatus> for i16 {
    fn from(value: ArticleStatus) -> Self {
        value.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for status in [
            ArticleStatus::Unpublished,
            ArticleStatus::Published,
            ArticleStatus::Private,
        ] {
            assert_eq!(ArticleStatus::from_code(status.code()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_code_is_rejected() {
        assert!(matches!(
            ArticleStatus::from_code(0),
            Err(DomainError::Validation(_))
        ));
        assert!(ArticleStatus::try_from(9).is_err());
    }

    #[test]
    fn only_published_is_public() {
        assert!(ArticleStatus::Published.is_public());
        assert!(!ArticleStatus::Private.is_public());
        assert!(!ArticleStatus::Unpublished.is_public());
    }
}
