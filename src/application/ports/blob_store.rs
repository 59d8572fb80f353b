//! Blob Store Port - 出站端口
//!
//! 定义音频 blob 存储的抽象接口，按键寻址
//! 各调用之间没有跨键的顺序或原子性保证

use async_trait::async_trait;
use thiserror::Error;

/// Blob 存储错误
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// 暂时性故障（网络、超时、存储端异常），可重试
    #[error("Blob store unavailable: {0}")]
    Unavailable(String),

    /// 容量故障
    #[error("Storage quota exceeded: used {used} bytes, limit {limit} bytes")]
    QuotaExceeded { used: u64, limit: u64 },

    /// 非法键（空、绝对路径、路径穿越）
    #[error("Invalid blob key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Blob Store Port
#[async_trait]
pub trait BlobStorePort: Send + Sync {
    /// 写入 blob；键已存在时覆盖
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobStoreError>;

    /// 检查 blob 是否存在
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError>;

    /// 删除 blob（幂等，键不存在也算成功）
    async fn delete(&self, key: &str) -> Result<(), BlobStoreError>;
}
