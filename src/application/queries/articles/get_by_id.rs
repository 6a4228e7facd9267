use super::ArticleQueryService;
use crate::{
    application::{context::CallContext, dto::ArticleDto, error::ApplicationResult},
    domain::{article::ArticleId, user::UserId},
};

/// Author-scoped read of a draft.
pub struct GetArticleByIdQuery {
    pub id: i64,
    pub author_id: i64,
}

impl ArticleQueryService {
    pub async fn get_by_id(
        &self,
        ctx: &CallContext,
        query: GetArticleByIdQuery,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(query.id)?;
        let author_id = UserId::new(query.author_id)?;
        let article = self.repository.get_by_id(ctx, id, author_id).await?;
        Ok(article.into())
    }
}
