// src/application/services/mod.rs
use std::sync::Arc;

use crate::application::{
    background::BackgroundTasks,
    commands::articles::ArticleCommandService,
    queries::articles::ArticleQueryService,
    repository::ArticleRepository,
};

pub struct ApplicationServices {
    pub article_commands: Arc<ArticleCommandService>,
    pub article_queries: Arc<ArticleQueryService>,
    repository: Arc<ArticleRepository>,
}

impl ApplicationServices {
    pub fn new(repository: Arc<ArticleRepository>) -> Self {
        let article_commands = Arc::new(ArticleCommandService::new(Arc::clone(&repository)));
        let article_queries = Arc::new(ArticleQueryService::new(Arc::clone(&repository)));

        Self {
            article_commands,
            article_queries,
            repository,
        }
    }

    pub fn background_tasks(&self) -> &BackgroundTasks {
        self.repository.background()
    }
}
