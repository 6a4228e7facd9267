// src/application/ports/id.rs
use crate::domain::article::ArticleId;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// Source of fresh article ids. Ids are positive and never reused.
#[async_trait]
pub trait IdGenerator: Send + Sync {
    async fn next_id(&self) -> DomainResult<ArticleId>;
}
