// src/application/repository.rs
use crate::application::background::BackgroundTasks;
use crate::application::context::CallContext;
use crate::application::ports::cache::{ArticleCache, CacheResult, FIRST_PAGE_SIZE};
use crate::domain::article::{
    Article, ArticleId, ArticleStatus, ArticleSyncCoordinator, ArticleUpdate, ArticleWrite,
    DraftArticleStore, LiveArticleStore, NewArticle,
};
use crate::domain::errors::DomainResult;
use crate::domain::user::UserId;
use std::future::Future;
use std::sync::Arc;

/// Entry point for article persistence.
///
/// Store-of-record failures propagate to the caller. Cache work is advisory:
/// invalidation, back-fill and pre-warm run as detached tasks and their
/// failures are logged, never returned.
#[derive(Clone)]
pub struct ArticleRepository {
    drafts: Arc<dyn DraftArticleStore>,
    live: Arc<dyn LiveArticleStore>,
    coordinator: Arc<dyn ArticleSyncCoordinator>,
    cache: Arc<dyn ArticleCache>,
    tasks: BackgroundTasks,
}

impl ArticleRepository {
    pub fn new(
        drafts: Arc<dyn DraftArticleStore>,
        live: Arc<dyn LiveArticleStore>,
        coordinator: Arc<dyn ArticleSyncCoordinator>,
        cache: Arc<dyn ArticleCache>,
        tasks: BackgroundTasks,
    ) -> Self {
        Self {
            drafts,
            live,
            coordinator,
            cache,
            tasks,
        }
    }

    pub const fn background(&self) -> &BackgroundTasks {
        &self.tasks
    }

    pub async fn create(&self, ctx: &CallContext, article: NewArticle) -> DomainResult<ArticleId> {
        let author_id = article.author_id;
        let created = ctx.bound(self.drafts.insert(article)).await??;
        self.invalidate_first_page(author_id);
        Ok(created.id)
    }

    pub async fn update(&self, ctx: &CallContext, update: ArticleUpdate) -> DomainResult<()> {
        let (id, author_id) = (update.id, update.author_id);
        ctx.bound(self.drafts.update_by_id(update)).await??;
        self.invalidate_first_page(author_id);
        self.invalidate_article(id, author_id);
        Ok(())
    }

    /// Publishes: writes the draft and the live copy in one transaction.
    pub async fn sync(&self, ctx: &CallContext, write: ArticleWrite) -> DomainResult<ArticleId> {
        let author_id = write.author_id();
        let id = ctx.bound(self.coordinator.sync(write)).await??;
        self.invalidate_first_page(author_id);
        self.invalidate_article(id, author_id);
        Ok(id)
    }

    pub async fn sync_status(
        &self,
        ctx: &CallContext,
        id: ArticleId,
        author_id: UserId,
        status: ArticleStatus,
    ) -> DomainResult<()> {
        ctx.bound(self.coordinator.sync_status(id, author_id, status))
            .await??;
        self.invalidate_first_page(author_id);
        self.invalidate_article(id, author_id);
        Ok(())
    }

    /// Lists an author's articles, most recently updated first.
    ///
    /// Windows inside the first [`FIRST_PAGE_SIZE`] rows are served from the
    /// first-page cache. A miss loads the whole first page so that any later
    /// window inside it can be answered from the cache. Wider windows go
    /// straight to the draft store and leave the first-page entry untouched.
    pub async fn list(
        &self,
        ctx: &CallContext,
        author_id: UserId,
        offset: u32,
        limit: u32,
    ) -> DomainResult<Vec<Article>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let window_end = offset as usize + limit as usize;
        if window_end > FIRST_PAGE_SIZE {
            let articles = ctx
                .bound(self.drafts.get_by_author(author_id, offset, limit))
                .await??;
            self.pre_warm(&articles);
            return Ok(articles);
        }

        match cache_read(ctx, self.cache.get_first_page(author_id)).await {
            Ok(Some(page)) => {
                let articles = window(&page, offset, limit);
                self.pre_warm(&articles);
                return Ok(articles);
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!(author_id = %author_id, error = %err, "failed to read first page cache");
            }
        }

        let page = ctx
            .bound(self.drafts.get_by_author(author_id, 0, FIRST_PAGE_SIZE as u32))
            .await??;
        let articles = window(&page, offset, limit);
        self.refresh_first_page(author_id, page);
        self.pre_warm(&articles);
        Ok(articles)
    }

    pub async fn get_by_id(
        &self,
        ctx: &CallContext,
        id: ArticleId,
        author_id: UserId,
    ) -> DomainResult<Article> {
        match cache_read(ctx, self.cache.get(id, author_id)).await {
            Ok(Some(article)) => return Ok(article),
            Ok(None) => {}
            Err(err) => {
                tracing::error!(
                    article_id = %id,
                    author_id = %author_id,
                    error = %err,
                    "failed to read article cache"
                );
            }
        }

        let article = ctx.bound(self.drafts.find_by_id(id, author_id)).await??;
        self.populate(article.clone());
        Ok(article)
    }

    /// Public read of the live copy. Not scoped by author.
    pub async fn get_published_by_id(
        &self,
        ctx: &CallContext,
        id: ArticleId,
    ) -> DomainResult<Option<Article>> {
        ctx.bound(self.live.find_by_id(id)).await?
    }

    fn invalidate_first_page(&self, author_id: UserId) {
        let cache = Arc::clone(&self.cache);
        self.tasks.spawn("invalidate_first_page", async move {
            if let Err(err) = cache.delete_first_page(author_id).await {
                tracing::error!(author_id = %author_id, error = %err, "failed to clear first page cache");
            }
        });
    }

    fn invalidate_article(&self, id: ArticleId, author_id: UserId) {
        let cache = Arc::clone(&self.cache);
        self.tasks.spawn("invalidate_article", async move {
            if let Err(err) = cache.delete(id, author_id).await {
                tracing::error!(
                    article_id = %id,
                    author_id = %author_id,
                    error = %err,
                    "failed to clear article cache"
                );
            }
        });
    }

    fn refresh_first_page(&self, author_id: UserId, page: Vec<Article>) {
        let cache = Arc::clone(&self.cache);
        self.tasks.spawn("refresh_first_page", async move {
            if let Err(err) = cache.set_first_page(author_id, &page).await {
                tracing::error!(author_id = %author_id, error = %err, "failed to refresh first page cache");
            }
        });
    }

    /// Bets that the most recent article in a listing is the next one opened.
    fn pre_warm(&self, articles: &[Article]) {
        if let Some(first) = articles.first() {
            self.populate(first.clone());
        }
    }

    fn populate(&self, article: Article) {
        if !article.is_cacheable() {
            return;
        }
        let cache = Arc::clone(&self.cache);
        self.tasks.spawn("populate_article", async move {
            if let Err(err) = cache.set(&article).await {
                tracing::error!(
                    article_id = %article.id,
                    author_id = %article.author_id,
                    error = %err,
                    "failed to cache article"
                );
            }
        });
    }
}

async fn cache_read<T, F>(ctx: &CallContext, fut: F) -> CacheResult<T>
where
    F: Future<Output = CacheResult<T>>,
{
    ctx.bound(fut).await.unwrap_or_else(|elapsed| Err(elapsed.into()))
}

fn window(page: &[Article], offset: u32, limit: u32) -> Vec<Article> {
    page.iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect()
}
