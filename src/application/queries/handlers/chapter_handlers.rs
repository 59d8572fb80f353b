//! Chapter Query Handlers

use std::sync::Arc;

use crate::application::error::ChapterError;
use crate::application::ports::{ChapterRecord, ChapterRepositoryPort};
use crate::application::queries::{GetChapter, ListChapters};

/// GetChapter Handler
pub struct GetChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl GetChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, query: GetChapter) -> Result<ChapterRecord, ChapterError> {
        self.chapter_repo
            .find_by_id(query.chapter_id)
            .await?
            .ok_or(ChapterError::NotFound(query.chapter_id))
    }
}

/// ListChapters Handler
pub struct ListChaptersHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl ListChaptersHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, query: ListChapters) -> Result<Vec<ChapterRecord>, ChapterError> {
        Ok(self.chapter_repo.find_by_book(query.book_id).await?)
    }
}
