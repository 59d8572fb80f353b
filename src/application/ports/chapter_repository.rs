//! Chapter Repository Port - 出站端口
//!
//! 定义章节记录持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// 章节上传状态
///
/// 状态机: pending -> ready | failed, failed -> ready（重试）
/// ready / failed 的章节都可以被删除；状态只由工作流和对账扫描变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChapterStatus {
    /// 记录已创建，blob 尚未写入
    Pending,
    /// blob 写入成功
    Ready,
    /// blob 写入失败，可重试
    Failed,
}

impl ChapterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterStatus::Pending => "pending",
            ChapterStatus::Ready => "ready",
            ChapterStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ChapterStatus::Pending),
            "ready" => Some(ChapterStatus::Ready),
            "failed" => Some(ChapterStatus::Failed),
            _ => None,
        }
    }
}

/// 章节实体（用于持久化）
///
/// 不变量:
/// - (book_id, order_index) 在所有章节中唯一
/// - storage_key 为 Some 当且仅当 status == Ready
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub order_index: u32,
    pub title: String,
    pub storage_key: Option<String>,
    /// 上传代次，从 1 开始；只在音频替换成功时递增
    pub revision: i64,
    pub status: ChapterStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChapterRecord {
    /// 检查 status 与 storage_key 的一致性不变式
    pub fn is_consistent(&self) -> bool {
        (self.status == ChapterStatus::Ready) == self.storage_key.is_some()
    }
}

/// Chapter Repository Port
///
/// 所有操作对单条记录原子；工作流层不依赖跨记录事务
#[async_trait]
pub trait ChapterRepositoryPort: Send + Sync {
    /// 插入新章节；(book_id, order_index) 冲突时返回 Conflict
    async fn insert(&self, chapter: &ChapterRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找章节
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ChapterRecord>, RepositoryError>;

    /// 按 order_index 升序返回某本书的全部章节
    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<ChapterRecord>, RepositoryError>;

    /// 返回指定状态的全部章节（对账扫描用）
    async fn find_by_status(
        &self,
        status: ChapterStatus,
    ) -> Result<Vec<ChapterRecord>, RepositoryError>;

    /// 更新上传状态、存储键和代次；章节不存在时返回 NotFound
    async fn update_status(
        &self,
        id: Uuid,
        status: ChapterStatus,
        storage_key: Option<&str>,
        revision: i64,
    ) -> Result<(), RepositoryError>;

    /// 更新元数据；order_index 冲突时返回 Conflict，章节不存在时返回 NotFound
    async fn update_metadata(
        &self,
        id: Uuid,
        title: &str,
        order_index: u32,
    ) -> Result<(), RepositoryError>;

    /// 删除章节（幂等，章节不存在也算成功）
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
