use super::ArticleQueryService;
use crate::{
    application::{context::CallContext, dto::ArticleDto, error::ApplicationResult},
    domain::user::UserId,
};

pub struct ListArticlesQuery {
    pub author_id: i64,
    pub offset: u32,
    pub limit: u32,
}

impl ArticleQueryService {
    pub async fn list(
        &self,
        ctx: &CallContext,
        query: ListArticlesQuery,
    ) -> ApplicationResult<Vec<ArticleDto>> {
        let author_id = UserId::new(query.author_id)?;
        let limit = normalize_limit(query.limit);

        let articles = self
            .repository
            .list(ctx, author_id, query.offset, limit)
            .await?;
        Ok(articles.into_iter().map(Into::into).collect())
    }
}

pub(super) fn normalize_limit(limit: u32) -> u32 {
    const DEFAULT_LIMIT: u32 = 20;
    const MAX_LIMIT: u32 = 100;

    if limit == 0 {
        DEFAULT_LIMIT
    } else {
        limit.min(MAX_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_limit;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(normalize_limit(0), 20);
        assert_eq!(normalize_limit(35), 35);
        assert_eq!(normalize_limit(500), 100);
    }
}
