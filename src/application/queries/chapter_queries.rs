//! Chapter Queries

use uuid::Uuid;

/// 查询单个章节
#[derive(Debug, Clone)]
pub struct GetChapter {
    pub chapter_id: Uuid,
}

/// 查询某本书的全部章节（按 order_index 升序）
#[derive(Debug, Clone)]
pub struct ListChapters {
    pub book_id: Uuid,
}
