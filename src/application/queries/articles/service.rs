use std::sync::Arc;

use crate::application::repository::ArticleRepository;

pub struct ArticleQueryService {
    pub(super) repository: Arc<ArticleRepository>,
}

impl ArticleQueryService {
    pub fn new(repository: Arc<ArticleRepository>) -> Self {
        Self { repository }
    }
}
