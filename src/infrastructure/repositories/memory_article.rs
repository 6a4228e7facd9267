// src/infrastructure/repositories/memory_article.rs
use crate::application::ports::{id::IdGenerator, time::Clock};
use crate::domain::article::{
    Article, ArticleId, ArticleStatus, ArticleSyncCoordinator, ArticleUpdate, ArticleWrite,
    DraftArticleStore, LiveArticleStore, NewArticle, next_updated_at,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::user::UserId;
use crate::infrastructure::{clock::SystemClock, id::SequentialIdGenerator};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

enum Staged {
    Insert(Article),
    Update(ArticleUpdate),
}

#[derive(Default)]
struct Tables {
    drafts: BTreeMap<ArticleId, Article>,
    live: BTreeMap<ArticleId, Article>,
}

impl Tables {
    fn owned_draft(&self, id: ArticleId, author_id: UserId) -> DomainResult<&Article> {
        self.drafts
            .get(&id)
            .filter(|draft| draft.author_id == author_id)
            .ok_or_else(DomainError::article_not_found)
    }

    fn updated_draft(&self, update: ArticleUpdate, now: DateTime<Utc>) -> DomainResult<Article> {
        let current = self.owned_draft(update.id, update.author_id)?;
        Ok(Article {
            title: update.title,
            content: update.content,
            status: update.status,
            updated_at: next_updated_at(current.updated_at, now),
            ..current.clone()
        })
    }

    fn upserted_live(&self, article: &Article) -> Article {
        match self.live.get(&article.id) {
            Some(existing) => Article {
                title: article.title.clone(),
                content: article.content.clone(),
                status: article.status,
                updated_at: next_updated_at(existing.updated_at, article.updated_at),
                ..existing.clone()
            },
            None => Article {
                created_at: article.updated_at,
                ..article.clone()
            },
        }
    }
}

/// Draft and live tables behind one mutex.
///
/// Both `sync` and `sync_status` compute every row they will write before
/// touching either table, so a failure leaves both tables as they were.
pub struct InMemoryArticleStore {
    tables: Mutex<Tables>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    live_unavailable: AtomicBool,
}

impl Default for InMemoryArticleStore {
    fn default() -> Self {
        Self::new(
            Arc::new(SequentialIdGenerator::default()),
            Arc::new(SystemClock),
        )
    }
}

impl InMemoryArticleStore {
    pub fn new(ids: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            ids,
            clock,
            live_unavailable: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every live-store write fail, as an unreachable replica would.
    pub fn set_live_unavailable(&self, unavailable: bool) {
        self.live_unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_live_available(&self) -> DomainResult<()> {
        if self.live_unavailable.load(Ordering::SeqCst) {
            Err(DomainError::Persistence("live store unavailable".into()))
        } else {
            Ok(())
        }
    }

    /// Writes a draft row verbatim, bypassing id generation and timestamps.
    pub fn put_draft(&self, article: Article) {
        self.lock().drafts.insert(article.id, article);
    }

    /// Writes a live row verbatim. The matching draft must already exist.
    pub fn put_live(&self, article: Article) -> DomainResult<()> {
        let mut tables = self.lock();
        if !tables.drafts.contains_key(&article.id) {
            return Err(DomainError::IntegrityViolation(
                "live article has no matching draft".into(),
            ));
        }
        tables.live.insert(article.id, article);
        Ok(())
    }

    pub fn draft(&self, id: ArticleId) -> Option<Article> {
        self.lock().drafts.get(&id).cloned()
    }

    pub fn live(&self, id: ArticleId) -> Option<Article> {
        self.lock().live.get(&id).cloned()
    }
}

#[async_trait]
impl DraftArticleStore for InMemoryArticleStore {
    async fn insert(&self, article: NewArticle) -> DomainResult<Article> {
        let id = self.ids.next_id().await?;
        let article = article.into_article(id, self.clock.now());

        let mut tables = self.lock();
        if tables.drafts.contains_key(&id) {
            return Err(DomainError::Persistence("article id already exists".into()));
        }
        tables.drafts.insert(id, article.clone());
        Ok(article)
    }

    async fn update_by_id(&self, update: ArticleUpdate) -> DomainResult<Article> {
        let now = self.clock.now();
        let mut tables = self.lock();
        let updated = tables.updated_draft(update, now)?;
        tables.drafts.insert(updated.id, updated.clone());
        Ok(updated)
    }

    async fn get_by_author(
        &self,
        author_id: UserId,
        offset: u32,
        limit: u32,
    ) -> DomainResult<Vec<Article>> {
        let tables = self.lock();
        let mut articles: Vec<Article> = tables
            .drafts
            .values()
            .filter(|article| article.author_id == author_id)
            .cloned()
            .collect();
        articles.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(articles
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: ArticleId, author_id: UserId) -> DomainResult<Article> {
        self.lock().owned_draft(id, author_id).cloned()
    }
}

#[async_trait]
impl LiveArticleStore for InMemoryArticleStore {
    async fn upsert(&self, article: &Article) -> DomainResult<()> {
        self.check_live_available()?;
        let mut tables = self.lock();
        if !tables.drafts.contains_key(&article.id) {
            return Err(DomainError::IntegrityViolation(
                "live article has no matching draft".into(),
            ));
        }
        let live = tables.upserted_live(article);
        tables.live.insert(live.id, live);
        Ok(())
    }

    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        Ok(self.lock().live.get(&id).cloned())
    }
}

#[async_trait]
impl ArticleSyncCoordinator for InMemoryArticleStore {
    async fn sync(&self, write: ArticleWrite) -> DomainResult<ArticleId> {
        let now = self.clock.now();
        // ids are drawn before locking; the guard is never held across an await
        let staged = match write {
            ArticleWrite::Insert(new_article) => {
                let id = self.ids.next_id().await?;
                Staged::Insert(new_article.into_article(id, now))
            }
            ArticleWrite::Update(update) => Staged::Update(update),
        };

        let mut tables = self.lock();
        let draft = match staged {
            Staged::Insert(article) => {
                if tables.drafts.contains_key(&article.id) {
                    return Err(DomainError::Persistence("article id already exists".into()));
                }
                article
            }
            Staged::Update(update) => tables.updated_draft(update, now)?,
        };
        self.check_live_available()?;
        let live = tables.upserted_live(&draft);

        let id = draft.id;
        tables.drafts.insert(id, draft);
        tables.live.insert(id, live);
        Ok(id)
    }

    async fn sync_status(
        &self,
        id: ArticleId,
        author_id: UserId,
        status: ArticleStatus,
    ) -> DomainResult<()> {
        let now = self.clock.now();
        let mut tables = self.lock();

        let current = tables.owned_draft(id, author_id)?;
        let draft = Article {
            status,
            updated_at: next_updated_at(current.updated_at, now),
            ..current.clone()
        };
        let live = match tables.live.get(&id) {
            Some(existing) => {
                self.check_live_available()?;
                Some(Article {
                    status,
                    updated_at: next_updated_at(existing.updated_at, now),
                    ..existing.clone()
                })
            }
            None => None,
        };

        tables.drafts.insert(id, draft);
        if let Some(live) = live {
            tables.live.insert(id, live);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::{ArticleContent, ArticleTitle};
    use crate::infrastructure::clock::ManualClock;
    use chrono::Duration;

    fn store() -> (InMemoryArticleStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let store = InMemoryArticleStore::new(
            Arc::new(SequentialIdGenerator::default()),
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        (store, clock)
    }

    fn new_article(author: i64, status: ArticleStatus) -> NewArticle {
        NewArticle {
            title: ArticleTitle::new("A Title").unwrap(),
            content: ArticleContent::new("This is content"),
            author_id: UserId::new(author).unwrap(),
            status,
        }
    }

    #[tokio::test]
    async fn failed_live_write_rolls_back_draft_update() {
        let (store, clock) = store();
        let id = store
            .sync(ArticleWrite::Insert(new_article(123, ArticleStatus::Published)))
            .await
            .unwrap();
        let before_draft = store.draft(id).unwrap();
        let before_live = store.live(id).unwrap();

        clock.advance(Duration::seconds(1));
        store.set_live_unavailable(true);
        let update = ArticleUpdate {
            id,
            title: ArticleTitle::new("Changed").unwrap(),
            content: ArticleContent::new("changed"),
            author_id: UserId(123),
            status: ArticleStatus::Published,
        };
        let err = store.sync(ArticleWrite::Update(update)).await.unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));

        assert_eq!(store.draft(id).unwrap(), before_draft);
        assert_eq!(store.live(id).unwrap(), before_live);
    }

    #[tokio::test]
    async fn failed_live_write_leaves_no_new_draft() {
        let (store, _clock) = store();
        store.set_live_unavailable(true);
        let err = store
            .sync(ArticleWrite::Insert(new_article(123, ArticleStatus::Published)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
        assert!(
            store
                .get_by_author(UserId(123), 0, 100)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn live_created_at_is_fixed_at_first_publish() {
        let (store, clock) = store();
        let id = store
            .sync(ArticleWrite::Insert(new_article(123, ArticleStatus::Published)))
            .await
            .unwrap();
        let first = store.live(id).unwrap();

        clock.advance(Duration::minutes(5));
        let update = ArticleUpdate {
            id,
            title: ArticleTitle::new("Second").unwrap(),
            content: ArticleContent::new("second"),
            author_id: UserId(123),
            status: ArticleStatus::Published,
        };
        store.sync(ArticleWrite::Update(update)).await.unwrap();

        let second = store.live(id).unwrap();
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.title.as_str(), "Second");
    }

    #[tokio::test]
    async fn live_upsert_without_draft_is_an_integrity_violation() {
        let (store, _clock) = store();
        let now = Utc::now();
        let orphan = new_article(5, ArticleStatus::Published).into_article(ArticleId(77), now);
        let err = LiveArticleStore::upsert(&store, &orphan).await.unwrap_err();
        assert!(matches!(err, DomainError::IntegrityViolation(_)));
    }

    #[tokio::test]
    async fn listing_orders_by_most_recent_update() {
        let (store, clock) = store();
        let first = store
            .insert(new_article(1, ArticleStatus::Unpublished))
            .await
            .unwrap();
        clock.advance(Duration::seconds(1));
        let second = store
            .insert(new_article(1, ArticleStatus::Unpublished))
            .await
            .unwrap();
        clock.advance(Duration::seconds(1));
        store
            .update_by_id(ArticleUpdate {
                id: first.id,
                title: ArticleTitle::new("touched").unwrap(),
                content: ArticleContent::default(),
                author_id: UserId(1),
                status: ArticleStatus::Unpublished,
            })
            .await
            .unwrap();

        let listed = store.get_by_author(UserId(1), 0, 10).await.unwrap();
        let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }
}
