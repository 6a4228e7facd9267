// src/domain/article/entity.rs
use crate::domain::article::status::ArticleStatus;
use crate::domain::article::value_objects::{ArticleContent, ArticleId, ArticleTitle};
use crate::domain::user::UserId;
use chrono::{DateTime, Duration, Utc};

/// A persisted article. Used for both the author's draft row and the public
/// live row; the two share one shape and the live row is always derived from
/// a draft write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: ArticleId,
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub author_id: UserId,
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub const fn is_cacheable(&self) -> bool {
        self.content.is_cacheable()
    }
}

/// Next `updated_at` for a row last touched at `previous`.
///
/// Keeps timestamps strictly increasing per row even when the clock stalls
/// or two writes land inside the same tick.
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    let floor = previous + Duration::microseconds(1);
    if now > floor { now } else { floor }
}

#[derive(Debug, Clone)]
pub struct NewArticle {
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub author_id: UserId,
    pub status: ArticleStatus,
}

impl NewArticle {
    pub fn into_article(
        self,
        id: ArticleId,
        created_at: DateTime<Utc>,
    ) -> Article {
        Article {
            id,
            title: self.title,
            content: self.content,
            author_id: self.author_id,
            status: self.status,
            created_at,
            updated_at: created_at,
        }
    }
}

/// Full replacement of the mutable fields of an existing draft. `author_id`
/// is part of the match predicate, never an assignment.
#[derive(Debug, Clone)]
pub struct ArticleUpdate {
    pub id: ArticleId,
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub author_id: UserId,
    pub status: ArticleStatus,
}

#[derive(Debug, Clone)]
pub enum ArticleWrite {
    Insert(NewArticle),
    Update(ArticleUpdate),
}

impl ArticleWrite {
    pub const fn author_id(&self) -> UserId {
        match self {
            Self::Insert(new) => new.author_id,
            Self::Update(update) => update.author_id,
        }
    }

    pub const fn id(&self) -> Option<ArticleId> {
        match self {
            Self::Insert(_) => None,
            Self::Update(update) => Some(update.id),
        }
    }
}

/// What an author submits: an article that may or may not have been saved
/// before. The target status is chosen by the operation, not the author.
#[derive(Debug, Clone)]
pub struct ArticleDraft {
    pub id: Option<ArticleId>,
    pub title: ArticleTitle,
    pub content: ArticleContent,
    pub author_id: UserId,
}

impl ArticleDraft {
    pub fn into_write(self, status: ArticleStatus) -> ArticleWrite {
        match self.id {
            Some(id) => ArticleWrite::Update(ArticleUpdate {
                id,
                title: self.title,
                content: self.content,
                author_id: self.author_id,
                status,
            }),
            None => ArticleWrite::Insert(NewArticle {
                title: self.title,
                content: self.content,
                author_id: self.author_id,
                status,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(id: Option<i64>) -> ArticleDraft {
        ArticleDraft {
            id: id.map(|id| ArticleId::new(id).unwrap()),
            title: ArticleTitle::new("A Title").unwrap(),
            content: ArticleContent::new("This is content"),
            author_id: UserId::new(123).unwrap(),
        }
    }

    #[test]
    fn draft_without_id_becomes_insert() {
        let write = draft(None).into_write(ArticleStatus::Published);
        assert!(write.id().is_none());
        match write {
            ArticleWrite::Insert(new) => assert_eq!(new.status, ArticleStatus::Published),
            ArticleWrite::Update(_) => panic!("expected insert"),
        }
    }

    #[test]
    fn draft_with_id_becomes_update() {
        let write = draft(Some(9)).into_write(ArticleStatus::Unpublished);
        assert_eq!(write.id(), Some(ArticleId(9)));
        assert_eq!(write.author_id(), UserId(123));
        assert!(matches!(write, ArticleWrite::Update(ref u) if u.status == ArticleStatus::Unpublished));
    }

    #[test]
    fn updated_at_strictly_increases_when_clock_stalls() {
        let now = Utc::now();
        assert_eq!(next_updated_at(now, now), now + Duration::microseconds(1));
        let earlier = now - Duration::seconds(5);
        assert!(next_updated_at(now, earlier) > now);
        let later = now + Duration::seconds(5);
        assert_eq!(next_updated_at(now, later), later);
    }
}
