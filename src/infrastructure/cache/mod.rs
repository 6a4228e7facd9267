// src/infrastructure/cache/mod.rs
mod memory;
mod record;
mod redis;

pub use memory::InMemoryArticleCache;
pub use record::CachedArticle;
pub use redis::RedisArticleCache;

use std::time::Duration;

/// Lifetimes of the two kinds of cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub first_page: Duration,
    pub article: Duration,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            first_page: Duration::from_secs(600),
            article: Duration::from_secs(60),
        }
    }
}
