// src/application/commands/articles/service.rs
use std::sync::Arc;

use crate::application::repository::ArticleRepository;

pub struct ArticleCommandService {
    pub(super) repository: Arc<ArticleRepository>,
}

impl ArticleCommandService {
    pub fn new(repository: Arc<ArticleRepository>) -> Self {
        Self { repository }
    }
}
