// tests/support/builders.rs
use chrono::{DateTime, Utc};

use mokkan_press::domain::article::*;
use mokkan_press::domain::user::UserId;

use super::mocks::fixed_now;

pub struct ArticleBuilder {
    id: i64,
    title: String,
    content: String,
    author_id: i64,
    status: ArticleStatus,
    updated_at: DateTime<Utc>,
}

impl ArticleBuilder {
    pub fn new() -> Self {
        Self {
            id: 1,
            title: "Test Article".into(),
            content: "Test content".into(),
            author_id: 1,
            status: ArticleStatus::Unpublished,
            updated_at: fixed_now(),
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn author(mut self, author_id: i64) -> Self {
        self.author_id = author_id;
        self
    }

    pub fn status(mut self, status: ArticleStatus) -> Self {
        self.status = status;
        self
    }

    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = at;
        self
    }

    pub fn build(self) -> Article {
        Article {
            id: ArticleId::new(self.id).unwrap(),
            title: ArticleTitle::new(self.title).unwrap(),
            content: ArticleContent::new(self.content),
            author_id: UserId::new(self.author_id).unwrap(),
            status: self.status,
            created_at: self.updated_at,
            updated_at: self.updated_at,
        }
    }
}

pub fn new_article(author_id: i64, title: &str, content: &str) -> NewArticle {
    NewArticle {
        title: ArticleTitle::new(title).unwrap(),
        content: ArticleContent::new(content),
        author_id: UserId::new(author_id).unwrap(),
        status: ArticleStatus::Unpublished,
    }
}

pub fn update_of(article: &Article, title: &str, status: ArticleStatus) -> ArticleUpdate {
    ArticleUpdate {
        id: article.id,
        title: ArticleTitle::new(title).unwrap(),
        content: article.content.clone(),
        author_id: article.author_id,
        status,
    }
}

/// Content one byte short of the cache size gate is still cacheable; this is
/// exactly at the gate and must never be cached.
pub fn oversized_content() -> String {
    "x".repeat(MAX_CACHEABLE_CONTENT_BYTES)
}
