// src/infrastructure/cache/redis.rs
use super::{CacheTtl, CachedArticle};
use crate::application::ports::cache::{
    ArticleCache, CacheError, CacheResult, FIRST_PAGE_SIZE, article_key, first_page_key,
};
use crate::domain::article::{Article, ArticleId};
use crate::domain::user::UserId;
use async_trait::async_trait;
use deadpool_redis::{Config as DeadpoolConfig, Connection, Pool, Runtime};
use redis::AsyncCommands;
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

#[derive(Clone)]
pub struct RedisArticleCache {
    pool: Pool,
    ttl: CacheTtl,
}

impl RedisArticleCache {
    /// Create a cache from a redis URL (e.g. redis://:password@host:6379/0).
    /// No connection is opened until the first command.
    pub fn from_url(url: &str, ttl: CacheTtl) -> Result<Self, CacheError> {
        let cfg = DeadpoolConfig::from_url(url);
        let pool = cfg
            .create_pool(Some(Runtime::Tokio1))
            .map_err(|err| CacheError::backend(err.to_string()))?;

        Ok(Self { pool, ttl })
    }

    pub async fn ping(&self) -> CacheResult<()> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;
        Ok(())
    }

    async fn connection(&self) -> CacheResult<Connection> {
        self.pool
            .get()
            .await
            .map_err(|err| CacheError::backend(err.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let mut conn = self.connection().await?;
        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;

        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> CacheResult<()> {
        let payload = serde_json::to_string(value)?;
        let mut conn = self.connection().await?;
        // SET .. EX keeps value and expiry in one round trip
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(payload)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;
        Ok(())
    }

    async fn delete_key(&self, key: &str) -> CacheResult<bool> {
        let mut conn = self.connection().await?;
        let removed: u64 = conn
            .del(key)
            .await
            .map_err(|err| CacheError::backend(err.to_string()))?;
        Ok(removed > 0)
    }
}

fn decode(record: CachedArticle) -> CacheResult<Article> {
    Article::try_from(record).map_err(|err| CacheError::Serialization(err.to_string()))
}

#[async_trait]
impl ArticleCache for RedisArticleCache {
    async fn get_first_page(&self, author_id: UserId) -> CacheResult<Option<Vec<Article>>> {
        let records: Option<Vec<CachedArticle>> =
            self.get_json(&first_page_key(author_id)).await?;
        records
            .map(|records| records.into_iter().map(decode).collect())
            .transpose()
    }

    async fn set_first_page(&self, author_id: UserId, articles: &[Article]) -> CacheResult<()> {
        let records: Vec<CachedArticle> = articles
            .iter()
            .take(FIRST_PAGE_SIZE)
            .map(CachedArticle::from)
            .collect();
        self.set_json(&first_page_key(author_id), &records, self.ttl.first_page)
            .await
    }

    async fn delete_first_page(&self, author_id: UserId) -> CacheResult<bool> {
        self.delete_key(&first_page_key(author_id)).await
    }

    async fn get(&self, id: ArticleId, author_id: UserId) -> CacheResult<Option<Article>> {
        let record: Option<CachedArticle> = self.get_json(&article_key(id, author_id)).await?;
        record.map(decode).transpose()
    }

    async fn set(&self, article: &Article) -> CacheResult<()> {
        if !article.is_cacheable() {
            return Ok(());
        }
        let record = CachedArticle::from(article);
        self.set_json(
            &article_key(article.id, article.author_id),
            &record,
            self.ttl.article,
        )
        .await
    }

    async fn delete(&self, id: ArticleId, author_id: UserId) -> CacheResult<bool> {
        self.delete_key(&article_key(id, author_id)).await
    }
}
