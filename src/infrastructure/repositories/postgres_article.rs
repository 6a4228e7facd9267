// src/infrastructure/repositories/postgres_article.rs
use super::map_sqlx;
use crate::application::ports::{id::IdGenerator, time::Clock};
use crate::domain::article::{
    Article, ArticleContent, ArticleId, ArticleStatus, ArticleSyncCoordinator, ArticleTitle,
    ArticleUpdate, ArticleWrite, DraftArticleStore, LiveArticleStore, NewArticle,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgExecutor, PgPool};
use std::sync::Arc;

#[derive(Clone)]
pub struct PostgresDraftArticleStore {
    pool: PgPool,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl PostgresDraftArticleStore {
    pub fn new(pool: PgPool, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, ids, clock }
    }
}

#[derive(Clone)]
pub struct PostgresLiveArticleStore {
    pool: PgPool,
}

impl PostgresLiveArticleStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Runs the draft write and the live upsert on one database transaction.
#[derive(Clone)]
pub struct PostgresArticleSyncCoordinator {
    pool: PgPool,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl PostgresArticleSyncCoordinator {
    pub fn new(pool: PgPool, ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, ids, clock }
    }
}

enum Staged {
    Insert(ArticleId, NewArticle),
    Update(ArticleUpdate),
}

#[derive(Debug, FromRow)]
struct ArticleRow {
    id: i64,
    title: String,
    content: String,
    author_id: i64,
    status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ArticleRow> for Article {
    type Error = DomainError;

    fn try_from(row: ArticleRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ArticleId::new(row.id)?,
            title: ArticleTitle::new(row.title)?,
            content: ArticleContent::new(row.content),
            author_id: UserId::new(row.author_id)?,
            status: ArticleStatus::from_code(row.status)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

async fn insert_draft<'e, E>(
    executor: E,
    id: ArticleId,
    article: NewArticle,
    now: DateTime<Utc>,
) -> DomainResult<Article>
where
    E: PgExecutor<'e>,
{
    let NewArticle {
        title,
        content,
        author_id,
        status,
    } = article;

    let row = sqlx::query_as::<_, ArticleRow>(
        "INSERT INTO articles (id, title, content, author_id, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $6)
         RETURNING id, title, content, author_id, status, created_at, updated_at",
    )
    .bind(i64::from(id))
    .bind(title.as_str())
    .bind(content.as_str())
    .bind(i64::from(author_id))
    .bind(status.code())
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(map_sqlx)?;

    Article::try_from(row)
}

async fn update_draft<'e, E>(
    executor: E,
    update: ArticleUpdate,
    now: DateTime<Utc>,
) -> DomainResult<Article>
where
    E: PgExecutor<'e>,
{
    let ArticleUpdate {
        id,
        title,
        content,
        author_id,
        status,
    } = update;

    // author_id is only ever part of the predicate: a foreign id matches no row
    let row = sqlx::query_as::<_, ArticleRow>(
        "UPDATE articles
         SET title = $1, content = $2, status = $3,
             updated_at = GREATEST($4, updated_at + INTERVAL '1 microsecond')
         WHERE id = $5 AND author_id = $6
         RETURNING id, title, content, author_id, status, created_at, updated_at",
    )
    .bind(title.as_str())
    .bind(content.as_str())
    .bind(status.code())
    .bind(now)
    .bind(i64::from(id))
    .bind(i64::from(author_id))
    .fetch_optional(executor)
    .await
    .map_err(map_sqlx)?;

    match row {
        Some(row) => Article::try_from(row),
        None => {
            tracing::warn!(article_id = %id, author_id = %author_id, "draft update matched no owned article");
            Err(DomainError::article_not_found())
        }
    }
}

async fn upsert_live<'e, E>(executor: E, article: &Article) -> DomainResult<()>
where
    E: PgExecutor<'e>,
{
    // created_at is only written by the insert arm, so it stays at the first publish
    sqlx::query(
        "INSERT INTO published_articles (id, title, content, author_id, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $6)
         ON CONFLICT (id) DO UPDATE SET
             title = EXCLUDED.title,
             content = EXCLUDED.content,
             status = EXCLUDED.status,
             updated_at = GREATEST(
                 EXCLUDED.updated_at,
                 published_articles.updated_at + INTERVAL '1 microsecond'
             )",
    )
    .bind(i64::from(article.id))
    .bind(article.title.as_str())
    .bind(article.content.as_str())
    .bind(i64::from(article.author_id))
    .bind(article.status.code())
    .bind(article.updated_at)
    .execute(executor)
    .await
    .map_err(map_sqlx)?;

    Ok(())
}

#[async_trait]
impl DraftArticleStore for PostgresDraftArticleStore {
    async fn insert(&self, article: NewArticle) -> DomainResult<Article> {
        let id = self.ids.next_id().await?;
        insert_draft(&self.pool, id, article, self.clock.now()).await
    }

    async fn update_by_id(&self, update: ArticleUpdate) -> DomainResult<Article> {
        update_draft(&self.pool, update, self.clock.now()).await
    }

    async fn get_by_author(
        &self,
        author_id: UserId,
        offset: u32,
        limit: u32,
    ) -> DomainResult<Vec<Article>> {
        let rows = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, title, content, author_id, status, created_at, updated_at
             FROM articles
             WHERE author_id = $1
             ORDER BY updated_at DESC, id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(i64::from(author_id))
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.into_iter().map(Article::try_from).collect()
    }

    async fn find_by_id(&self, id: ArticleId, author_id: UserId) -> DomainResult<Article> {
        let row = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, title, content, author_id, status, created_at, updated_at
             FROM articles WHERE id = $1 AND author_id = $2",
        )
        .bind(i64::from(id))
        .bind(i64::from(author_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        match row {
            Some(row) => Article::try_from(row),
            None => {
                tracing::debug!(article_id = %id, author_id = %author_id, "draft lookup matched no owned article");
                Err(DomainError::article_not_found())
            }
        }
    }
}

#[async_trait]
impl LiveArticleStore for PostgresLiveArticleStore {
    async fn upsert(&self, article: &Article) -> DomainResult<()> {
        upsert_live(&self.pool, article).await
    }

    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        let row = sqlx::query_as::<_, ArticleRow>(
            "SELECT id, title, content, author_id, status, created_at, updated_at
             FROM published_articles WHERE id = $1",
        )
        .bind(i64::from(id))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.map(Article::try_from).transpose()
    }
}

#[async_trait]
impl ArticleSyncCoordinator for PostgresArticleSyncCoordinator {
    async fn sync(&self, write: ArticleWrite) -> DomainResult<ArticleId> {
        let now = self.clock.now();

        // the id is drawn before the transaction holds a connection, so a
        // publish never waits on the pool while already owning a slot of it
        let staged = match write {
            ArticleWrite::Insert(new_article) => {
                Staged::Insert(self.ids.next_id().await?, new_article)
            }
            ArticleWrite::Update(update) => Staged::Update(update),
        };

        // dropping the transaction on any early return rolls both writes back
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let draft = match staged {
            Staged::Insert(id, new_article) => insert_draft(&mut *tx, id, new_article, now).await?,
            Staged::Update(update) => update_draft(&mut *tx, update, now).await?,
        };

        upsert_live(&mut *tx, &draft).await?;
        tx.commit().await.map_err(map_sqlx)?;

        Ok(draft.id)
    }

    async fn sync_status(
        &self,
        id: ArticleId,
        author_id: UserId,
        status: ArticleStatus,
    ) -> DomainResult<()> {
        let now = self.clock.now();
        let mut tx = self.pool.begin().await.map_err(map_sqlx)?;

        let drafts = sqlx::query(
            "UPDATE articles
             SET status = $1, updated_at = GREATEST($2, updated_at + INTERVAL '1 microsecond')
             WHERE id = $3 AND author_id = $4",
        )
        .bind(status.code())
        .bind(now)
        .bind(i64::from(id))
        .bind(i64::from(author_id))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?
        .rows_affected();

        match drafts {
            0 => {
                tracing::warn!(article_id = %id, author_id = %author_id, "status change matched no owned article");
                return Err(DomainError::article_not_found());
            }
            1 => {}
            n => {
                return Err(DomainError::IntegrityViolation(format!(
                    "status change for article {id} touched {n} draft rows"
                )));
            }
        }

        let live = sqlx::query(
            "UPDATE published_articles
             SET status = $1, updated_at = GREATEST($2, updated_at + INTERVAL '1 microsecond')
             WHERE id = $3",
        )
        .bind(status.code())
        .bind(now)
        .bind(i64::from(id))
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx)?
        .rows_affected();

        if live > 1 {
            return Err(DomainError::IntegrityViolation(format!(
                "status change for article {id} touched {live} live rows"
            )));
        }

        tx.commit().await.map_err(map_sqlx)?;
        Ok(())
    }
}
