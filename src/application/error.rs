//! 应用层错误定义
//!
//! 章节工作流的封闭错误分类，调用方可以穷尽匹配每一种失败

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{BlobStoreError, ChapterStatus, RepositoryError};

/// 章节工作流错误
#[derive(Debug, Error)]
pub enum ChapterError {
    /// 输入校验失败，不可重试
    #[error("Validation error: {0}")]
    Validation(String),

    /// (book_id, order_index) 冲突；调用方可换序号重新提交
    #[error("Duplicate order index: {0}")]
    DuplicateOrder(String),

    /// 章节不存在
    #[error("Chapter not found: {0}")]
    NotFound(Uuid),

    /// 工作流作用在错误状态的章节上（调用方使用错误）
    #[error("Invalid chapter state: expected {expected}, actual {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// blob 写入失败或超时；记录已置为 failed，可重试
    #[error("Chapter upload failed: {source}")]
    UploadFailed {
        #[source]
        source: BlobStoreError,
    },

    /// 上传之外的 blob 存储失败（如删除时存储不可用）
    #[error("Blob store error: {0}")]
    Storage(#[source] BlobStoreError),

    /// 持久化层故障
    #[error("Repository error: {0}")]
    Repository(String),
}

impl ChapterError {
    /// 创建校验错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(expected: ChapterStatus, actual: ChapterStatus) -> Self {
        Self::InvalidState {
            expected: expected.as_str(),
            actual: actual.as_str(),
        }
    }
}

impl From<RepositoryError> for ChapterError {
    fn from(err: RepositoryError) -> Self {
        // Conflict / NotFound 在各工作流中按语义显式翻译，
        // 走到这里的都是基础设施故障
        Self::Repository(err.to_string())
    }
}
