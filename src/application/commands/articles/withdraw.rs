// src/application/commands/articles/withdraw.rs
use super::ArticleCommandService;
use crate::{
    application::{context::CallContext, error::ApplicationResult},
    domain::{
        article::{ArticleId, ArticleStatus},
        user::UserId,
    },
};

pub struct WithdrawArticleCommand {
    pub id: i64,
    pub author_id: i64,
}

impl ArticleCommandService {
    /// Hides a published article. Withdrawing an article that is already
    /// private succeeds again and only refreshes its timestamps.
    pub async fn withdraw(
        &self,
        ctx: &CallContext,
        command: WithdrawArticleCommand,
    ) -> ApplicationResult<()> {
        let id = ArticleId::new(command.id)?;
        let author_id = UserId::new(command.author_id)?;
        self.repository
            .sync_status(ctx, id, author_id, ArticleStatus::Private)
            .await?;
        Ok(())
    }
}
