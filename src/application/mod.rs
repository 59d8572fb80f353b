//! 应用层 - 章节上传编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（ChapterRepository、BlobStore）
//! - commands: CQRS 命令及处理器（创建、重试、替换、更新、删除、对账）
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误分类

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Chapter commands
    CreateChapter,
    DeleteChapter,
    ReconcileChapters,
    ReplaceChapterAudio,
    RetryChapterUpload,
    UpdateChapter,
    // Handlers
    handlers::{
        CreateChapterHandler, DeleteChapterHandler, ReconcileChaptersHandler, ReconcileReport,
        ReplaceChapterAudioHandler, RetryChapterUploadHandler, UpdateChapterHandler,
    },
};

pub use error::ChapterError;

pub use ports::{
    BlobStoreError, BlobStorePort, ChapterRecord, ChapterRepositoryPort, ChapterStatus,
    RepositoryError,
};

pub use queries::{
    // Chapter queries
    GetChapter,
    ListChapters,
    // Handlers
    handlers::{GetChapterHandler, ListChaptersHandler},
};
