// src/application/commands/articles/mod.rs
mod publish;
mod save;
mod service;
mod withdraw;

pub use publish::PublishArticleCommand;
pub use save::SaveArticleCommand;
pub use service::ArticleCommandService;
pub use withdraw::WithdrawArticleCommand;

use crate::{
    application::error::ApplicationResult,
    domain::{
        article::{ArticleContent, ArticleDraft, ArticleId, ArticleTitle},
        user::UserId,
    },
};

pub(super) fn build_draft(
    id: Option<i64>,
    title: String,
    content: String,
    author_id: i64,
) -> ApplicationResult<ArticleDraft> {
    Ok(ArticleDraft {
        id: id.filter(|id| *id > 0).map(ArticleId::new).transpose()?,
        title: ArticleTitle::new(title)?,
        content: ArticleContent::new(content),
        author_id: UserId::new(author_id)?,
    })
}
