//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod blob_store;
mod chapter_repository;

pub use blob_store::{BlobStoreError, BlobStorePort};
pub use chapter_repository::{
    ChapterRecord, ChapterRepositoryPort, ChapterStatus, RepositoryError,
};
