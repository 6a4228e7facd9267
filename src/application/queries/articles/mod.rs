mod get_by_id;
mod get_published;
mod list;
mod service;

pub use get_by_id::GetArticleByIdQuery;
pub use get_published::GetPublishedArticleQuery;
pub use list::ListArticlesQuery;
pub use service::ArticleQueryService;
