// tests/support/mocks/stores.rs
use mokkan_press::domain::article::{
    Article, ArticleId, ArticleUpdate, DraftArticleStore, NewArticle,
};
use mokkan_press::domain::errors::{DomainError, DomainResult};
use mokkan_press::domain::user::UserId;
use mokkan_press::infrastructure::repositories::InMemoryArticleStore;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Draft store that counts reads before delegating to the in-memory tables.
/// A cache hit shows up as a read count that did not move.
pub struct CountingDraftStore {
    inner: Arc<InMemoryArticleStore>,
    list_reads: AtomicUsize,
    id_reads: AtomicUsize,
    last_window: std::sync::Mutex<Option<(u32, u32)>>,
}

impl CountingDraftStore {
    pub fn new(inner: Arc<InMemoryArticleStore>) -> Self {
        Self {
            inner,
            list_reads: AtomicUsize::new(0),
            id_reads: AtomicUsize::new(0),
            last_window: std::sync::Mutex::new(None),
        }
    }

    pub fn list_reads(&self) -> usize {
        self.list_reads.load(Ordering::SeqCst)
    }

    pub fn id_reads(&self) -> usize {
        self.id_reads.load(Ordering::SeqCst)
    }

    /// `(offset, limit)` of the most recent listing read.
    pub fn last_window(&self) -> Option<(u32, u32)> {
        *self.last_window.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl DraftArticleStore for CountingDraftStore {
    async fn insert(&self, article: NewArticle) -> DomainResult<Article> {
        self.inner.insert(article).await
    }

    async fn update_by_id(&self, update: ArticleUpdate) -> DomainResult<Article> {
        self.inner.update_by_id(update).await
    }

    async fn get_by_author(
        &self,
        author_id: UserId,
        offset: u32,
        limit: u32,
    ) -> DomainResult<Vec<Article>> {
        self.list_reads.fetch_add(1, Ordering::SeqCst);
        *self.last_window.lock().unwrap() = Some((offset, limit));
        self.inner.get_by_author(author_id, offset, limit).await
    }

    async fn find_by_id(&self, id: ArticleId, author_id: UserId) -> DomainResult<Article> {
        self.id_reads.fetch_add(1, Ordering::SeqCst);
        DraftArticleStore::find_by_id(self.inner.as_ref(), id, author_id).await
    }
}

/// Draft store whose every call outlives any reasonable deadline.
pub struct StalledDraftStore {
    pub delay: Duration,
}

impl StalledDraftStore {
    async fn stall<T>(&self) -> DomainResult<T> {
        tokio::time::sleep(self.delay).await;
        Err(DomainError::Persistence("stalled store answered late".into()))
    }
}

#[async_trait::async_trait]
impl DraftArticleStore for StalledDraftStore {
    async fn insert(&self, _article: NewArticle) -> DomainResult<Article> {
        self.stall().await
    }

    async fn update_by_id(&self, _update: ArticleUpdate) -> DomainResult<Article> {
        self.stall().await
    }

    async fn get_by_author(
        &self,
        _author_id: UserId,
        _offset: u32,
        _limit: u32,
    ) -> DomainResult<Vec<Article>> {
        self.stall().await
    }

    async fn find_by_id(&self, _id: ArticleId, _author_id: UserId) -> DomainResult<Article> {
        self.stall().await
    }
}
