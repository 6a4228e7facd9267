pub mod entity;
pub mod repository;
pub mod status;
pub mod value_objects;

pub use entity::{Article, ArticleDraft, ArticleUpdate, ArticleWrite, NewArticle, next_updated_at};
pub use repository::{ArticleSyncCoordinator, DraftArticleStore, LiveArticleStore};
pub use status::ArticleStatus;
pub use value_objects::{ArticleContent, ArticleId, ArticleTitle, MAX_CACHEABLE_CONTENT_BYTES};
