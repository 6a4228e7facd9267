// tests/support/helpers.rs
use std::sync::Arc;
use std::time::Duration;

use mokkan_press::application::background::BackgroundTasks;
use mokkan_press::application::context::CallContext;
use mokkan_press::application::ports::cache::ArticleCache;
use mokkan_press::application::ports::time::Clock;
use mokkan_press::application::repository::ArticleRepository;
use mokkan_press::application::services::ApplicationServices;
use mokkan_press::domain::article::{ArticleSyncCoordinator, DraftArticleStore, LiveArticleStore};
use mokkan_press::infrastructure::cache::InMemoryArticleCache;
use mokkan_press::infrastructure::clock::ManualClock;
use mokkan_press::infrastructure::id::SequentialIdGenerator;
use mokkan_press::infrastructure::repositories::InMemoryArticleStore;

use super::mocks::{CountingDraftStore, fixed_now};

/// Repository wired over in-memory stores and cache, with handles on every
/// collaborator so tests can inspect them directly.
pub struct Harness {
    pub store: Arc<InMemoryArticleStore>,
    pub drafts: Arc<CountingDraftStore>,
    pub cache: Arc<InMemoryArticleCache>,
    pub clock: Arc<ManualClock>,
    pub repository: Arc<ArticleRepository>,
    pub services: ApplicationServices,
}

impl Harness {
    pub fn new() -> Self {
        Self::starting_at_id(1)
    }

    /// Ids are handed out from `first` upward.
    pub fn starting_at_id(first: i64) -> Self {
        let clock = Arc::new(ManualClock::new(fixed_now()));
        let store = Arc::new(InMemoryArticleStore::new(
            Arc::new(SequentialIdGenerator::starting_at(first)),
            Arc::clone(&clock) as Arc<dyn Clock>,
        ));
        let drafts = Arc::new(CountingDraftStore::new(Arc::clone(&store)));
        let cache = Arc::new(InMemoryArticleCache::default());

        let repository = Arc::new(ArticleRepository::new(
            Arc::clone(&drafts) as Arc<dyn DraftArticleStore>,
            Arc::clone(&store) as Arc<dyn LiveArticleStore>,
            Arc::clone(&store) as Arc<dyn ArticleSyncCoordinator>,
            Arc::clone(&cache) as Arc<dyn ArticleCache>,
            BackgroundTasks::new(Duration::from_millis(500)),
        ));
        let services = ApplicationServices::new(Arc::clone(&repository));

        Self {
            store,
            drafts,
            cache,
            clock,
            repository,
            services,
        }
    }

    /// Moves the store clock forward so the next write sorts after the last.
    pub fn tick(&self) {
        self.clock.advance(chrono::Duration::seconds(1));
    }

    /// Waits for detached cache work so assertions see its effects.
    pub async fn settle(&self) {
        self.repository.background().drain().await;
    }
}

pub fn ctx() -> CallContext {
    CallContext::with_timeout(Duration::from_secs(5))
}
