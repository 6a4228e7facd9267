use crate::domain::article::{
    Article, ArticleContent, ArticleId, ArticleStatus, ArticleTitle,
};
use crate::domain::errors::DomainError;
use crate::domain::user::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wire form of a cached article. Status is stored by numeric code so that a
/// renamed variant never invalidates existing entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedArticle {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub status: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Article> for CachedArticle {
    fn from(article: &Article) -> Self {
        Self {
            id: article.id.into(),
            title: article.title.as_str().to_string(),
            content: article.content.as_str().to_string(),
            author_id: article.author_id.into(),
            status: article.status.code(),
            created_at: article.created_at,
            updated_at: article.updated_at,
        }
    }
}

impl TryFrom<CachedArticle> for Article {
    type Error = DomainError;

    fn try_from(record: CachedArticle) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ArticleId::new(record.id)?,
            title: ArticleTitle::new(record.title)?,
            content: ArticleContent::new(record.content),
            author_id: UserId::new(record.author_id)?,
            status: ArticleStatus::from_code(record.status)?,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corrupt_status_is_rejected() {
        let record = CachedArticle {
            id: 1,
            title: "t".into(),
            content: String::new(),
            author_id: 2,
            status: 42,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(Article::try_from(record).is_err());
    }
}
