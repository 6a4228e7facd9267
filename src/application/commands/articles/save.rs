// src/application/commands/articles/save.rs
use super::{ArticleCommandService, build_draft};
use crate::{
    application::{context::CallContext, error::ApplicationResult},
    domain::article::{ArticleStatus, ArticleWrite},
};

/// Saves a draft without publishing it. An `id` of `None` (or `0`) creates a
/// new article.
pub struct SaveArticleCommand {
    pub id: Option<i64>,
    pub author_id: i64,
    pub title: String,
    pub content: String,
}

impl ArticleCommandService {
    pub async fn save(
        &self,
        ctx: &CallContext,
        command: SaveArticleCommand,
    ) -> ApplicationResult<i64> {
        let draft = build_draft(command.id, command.title, command.content, command.author_id)?;

        match draft.into_write(ArticleStatus::Unpublished) {
            ArticleWrite::Update(update) => {
                let id = update.id;
                self.repository.update(ctx, update).await?;
                Ok(id.into())
            }
            ArticleWrite::Insert(new_article) => {
                let id = self.repository.create(ctx, new_article).await?;
                Ok(id.into())
            }
        }
    }
}
