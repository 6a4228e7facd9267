use super::CacheTtl;
use crate::application::ports::cache::{
    ArticleCache, CacheError, CacheResult, FIRST_PAGE_SIZE, article_key, first_page_key,
};
use crate::domain::article::{Article, ArticleId};
use crate::domain::user::UserId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::Instant;

#[derive(Clone)]
enum Entry {
    FirstPage(Vec<Article>),
    Article(Article),
}

struct Slot {
    entry: Entry,
    expires_at: Instant,
}

/// Process-local [`ArticleCache`] with per-entry expiry. Expired entries are
/// dropped lazily on access.
pub struct InMemoryArticleCache {
    slots: Mutex<HashMap<String, Slot>>,
    ttl: CacheTtl,
    unavailable: AtomicBool,
}

impl Default for InMemoryArticleCache {
    fn default() -> Self {
        Self::new(CacheTtl::default())
    }
}

impl InMemoryArticleCache {
    pub fn new(ttl: CacheTtl) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            ttl,
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every operation fail with a backend error, as a lost connection
    /// would.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn contains_article(&self, id: ArticleId, author_id: UserId) -> bool {
        self.live_entry(&article_key(id, author_id)).is_some()
    }

    pub fn contains_first_page(&self, author_id: UserId) -> bool {
        self.live_entry(&first_page_key(author_id)).is_some()
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, HashMap<String, Slot>>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CacheError::backend("cache unavailable"));
        }
        Ok(self.slots.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn live_entry(&self, key: &str) -> Option<Entry> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        take_live(&mut slots, key)
    }

    fn get_entry(&self, key: &str) -> CacheResult<Option<Entry>> {
        let mut slots = self.lock()?;
        Ok(take_live(&mut slots, key))
    }

    fn put(&self, key: String, entry: Entry, ttl: std::time::Duration) -> CacheResult<()> {
        let mut slots = self.lock()?;
        slots.insert(
            key,
            Slot {
                entry,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<bool> {
        let mut slots = self.lock()?;
        Ok(slots
            .remove(key)
            .is_some_and(|slot| slot.expires_at > Instant::now()))
    }
}

fn take_live(slots: &mut HashMap<String, Slot>, key: &str) -> Option<Entry> {
    match slots.get(key) {
        Some(slot) if slot.expires_at > Instant::now() => Some(slot.entry.clone()),
        Some(_) => {
            slots.remove(key);
            None
        }
        None => None,
    }
}

#[async_trait]
impl ArticleCache for InMemoryArticleCache {
    async fn get_first_page(&self, author_id: UserId) -> CacheResult<Option<Vec<Article>>> {
        match self.get_entry(&first_page_key(author_id))? {
            Some(Entry::FirstPage(page)) => Ok(Some(page)),
            Some(Entry::Article(_)) => Err(CacheError::Serialization(
                "first page key holds a single article".into(),
            )),
            None => Ok(None),
        }
    }

    async fn set_first_page(&self, author_id: UserId, articles: &[Article]) -> CacheResult<()> {
        let page = articles.iter().take(FIRST_PAGE_SIZE).cloned().collect();
        self.put(
            first_page_key(author_id),
            Entry::FirstPage(page),
            self.ttl.first_page,
        )
    }

    async fn delete_first_page(&self, author_id: UserId) -> CacheResult<bool> {
        self.remove(&first_page_key(author_id))
    }

    async fn get(&self, id: ArticleId, author_id: UserId) -> CacheResult<Option<Article>> {
        match self.get_entry(&article_key(id, author_id))? {
            Some(Entry::Article(article)) => Ok(Some(article)),
            Some(Entry::FirstPage(_)) => Err(CacheError::Serialization(
                "article key holds a first page".into(),
            )),
            None => Ok(None),
        }
    }

    async fn set(&self, article: &Article) -> CacheResult<()> {
        if !article.is_cacheable() {
            return Ok(());
        }
        self.put(
            article_key(article.id, article.author_id),
            Entry::Article(article.clone()),
            self.ttl.article,
        )
    }

    async fn delete(&self, id: ArticleId, author_id: UserId) -> CacheResult<bool> {
        self.remove(&article_key(id, author_id))
    }
}
