// src/application/commands/articles/publish.rs
use super::{ArticleCommandService, build_draft};
use crate::{
    application::{context::CallContext, error::ApplicationResult},
    domain::article::ArticleStatus,
};

/// Publishes an article, creating it first when `id` is `None` (or `0`).
pub struct PublishArticleCommand {
    pub id: Option<i64>,
    pub author_id: i64,
    pub title: String,
    pub content: String,
}

impl ArticleCommandService {
    pub async fn publish(
        &self,
        ctx: &CallContext,
        command: PublishArticleCommand,
    ) -> ApplicationResult<i64> {
        let draft = build_draft(command.id, command.title, command.content, command.author_id)?;
        let id = self
            .repository
            .sync(ctx, draft.into_write(ArticleStatus::Published))
            .await?;
        Ok(id.into())
    }
}
