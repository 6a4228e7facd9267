// src/application/ports/cache.rs
use crate::application::context::DeadlineExceeded;
use crate::domain::article::{Article, ArticleId};
use crate::domain::user::UserId;
use async_trait::async_trait;
use thiserror::Error;

/// Number of articles held by an author's first-page entry.
pub const FIRST_PAGE_SIZE: usize = 100;

/// A cache backend failure. A clean miss is never reported through this type.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache serialization error: {0}")]
    Serialization(String),
    #[error("cache operation timed out")]
    Timeout,
}

impl CacheError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl From<DeadlineExceeded> for CacheError {
    fn from(_: DeadlineExceeded) -> Self {
        Self::Timeout
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-aside storage for article reads.
///
/// Every key is scoped by author, so an entry written for one author can
/// never be returned to another. Lookups report a miss as `Ok(None)`;
/// deletes report an absent key as `Ok(false)`.
#[async_trait]
pub trait ArticleCache: Send + Sync {
    async fn get_first_page(&self, author_id: UserId) -> CacheResult<Option<Vec<Article>>>;

    /// Stores at most [`FIRST_PAGE_SIZE`] articles.
    async fn set_first_page(&self, author_id: UserId, articles: &[Article]) -> CacheResult<()>;

    async fn delete_first_page(&self, author_id: UserId) -> CacheResult<bool>;

    async fn get(&self, id: ArticleId, author_id: UserId) -> CacheResult<Option<Article>>;

    /// Articles that fail [`Article::is_cacheable`] are skipped without error.
    async fn set(&self, article: &Article) -> CacheResult<()>;

    async fn delete(&self, id: ArticleId, author_id: UserId) -> CacheResult<bool>;
}

pub fn first_page_key(author_id: UserId) -> String {
    format!("article:first_page:{author_id}")
}

pub fn article_key(id: ArticleId, author_id: UserId) -> String {
    format!("article:detail:{author_id}:{id}")
}
