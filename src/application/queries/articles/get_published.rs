use super::ArticleQueryService;
use crate::{
    application::{
        context::CallContext,
        dto::ArticleDto,
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::ArticleId,
};

/// Public read. Withdrawn articles are reported exactly like missing ones.
pub struct GetPublishedArticleQuery {
    pub id: i64,
}

impl ArticleQueryService {
    pub async fn get_published(
        &self,
        ctx: &CallContext,
        query: GetPublishedArticleQuery,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(query.id)?;
        let article = self
            .repository
            .get_published_by_id(ctx, id)
            .await?
            .filter(|article| article.status.is_public())
            .ok_or_else(|| ApplicationError::not_found("article not found"))?;
        Ok(article.into())
    }
}
