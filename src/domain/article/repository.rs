use crate::domain::article::entity::{Article, ArticleUpdate, ArticleWrite, NewArticle};
use crate::domain::article::status::ArticleStatus;
use crate::domain::article::value_objects::ArticleId;
use crate::domain::errors::DomainResult;
use crate::domain::user::UserId;
use async_trait::async_trait;

/// The author's editable copy, keyed by `(id, author_id)`.
#[async_trait]
pub trait DraftArticleStore: Send + Sync {
    /// Persists a new draft with a freshly generated id and `created_at ==
    /// updated_at == now`.
    async fn insert(&self, article: NewArticle) -> DomainResult<Article>;

    /// Overwrites title, content and status of the row matching both `id` and
    /// `author_id`. No match yields `OwnershipOrNotFound`.
    async fn update_by_id(&self, update: ArticleUpdate) -> DomainResult<Article>;

    /// Most recently updated first.
    async fn get_by_author(
        &self,
        author_id: UserId,
        offset: u32,
        limit: u32,
    ) -> DomainResult<Vec<Article>>;

    async fn find_by_id(&self, id: ArticleId, author_id: UserId) -> DomainResult<Article>;
}

/// The public projection, keyed by `id` alone.
#[async_trait]
pub trait LiveArticleStore: Send + Sync {
    /// Insert-or-update. On conflict only title, content, status and
    /// `updated_at` change; `created_at` stays at the first publish.
    async fn upsert(&self, article: &Article) -> DomainResult<()>;

    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>>;
}

/// Writes the draft and live copies of one article as a single atomic unit.
#[async_trait]
pub trait ArticleSyncCoordinator: Send + Sync {
    /// Inserts or updates the draft, then upserts the live row with the same
    /// id and status. Returns the article id.
    async fn sync(&self, write: ArticleWrite) -> DomainResult<ArticleId>;

    /// Sets the status on both copies. The draft update must touch exactly one
    /// row owned by `author_id`.
    async fn sync_status(
        &self,
        id: ArticleId,
        author_id: UserId,
        status: ArticleStatus,
    ) -> DomainResult<()>;
}
