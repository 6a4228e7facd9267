use crate::application::ports::id::IdGenerator;
use crate::domain::article::ArticleId;
use crate::domain::errors::{DomainError, DomainResult};
use crate::infrastructure::repositories::map_sqlx;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::atomic::{AtomicI64, Ordering};

/// Draws ids from the `article_id_seq` Postgres sequence. Sequences are not
/// transactional, so an id drawn by a rolled-back publish is simply skipped.
#[derive(Clone)]
pub struct PostgresSequenceIdGenerator {
    pool: PgPool,
}

impl PostgresSequenceIdGenerator {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdGenerator for PostgresSequenceIdGenerator {
    async fn next_id(&self) -> DomainResult<ArticleId> {
        let id: i64 = sqlx::query_scalar("SELECT nextval('article_id_seq')")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx)?;
        ArticleId::new(id)
    }
}

/// In-process counter starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicI64,
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl SequentialIdGenerator {
    pub const fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

#[async_trait]
impl IdGenerator for SequentialIdGenerator {
    async fn next_id(&self) -> DomainResult<ArticleId> {
        let id = self.next.fetch_add(1, Ordering::Relaxed);
        if id <= 0 {
            return Err(DomainError::Persistence("article id sequence exhausted".into()));
        }
        ArticleId::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sequential_ids_are_distinct_and_positive() {
        let ids = SequentialIdGenerator::default();
        let first = ids.next_id().await.unwrap();
        let second = ids.next_id().await.unwrap();
        assert_eq!(first, ArticleId(1));
        assert_eq!(second, ArticleId(2));
    }

    #[tokio::test]
    async fn exhausted_sequence_fails() {
        let ids = SequentialIdGenerator::starting_at(i64::MIN);
        assert!(matches!(
            ids.next_id().await,
            Err(DomainError::Persistence(_))
        ));
    }
}
