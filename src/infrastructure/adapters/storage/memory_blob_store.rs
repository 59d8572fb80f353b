//! Memory Blob Store - 内存 blob 存储
//!
//! 用于测试和本地开发，支持注入故障（不可用、写入延迟）

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::application::ports::{BlobStoreError, BlobStorePort};

/// 内存 blob 存储
pub struct MemoryBlobStore {
    blobs: DashMap<String, Vec<u8>>,
    /// 最大存储空间（字节），0 表示不限制
    max_size_bytes: u64,
    /// 为 true 时所有 put 返回 Unavailable
    unavailable: AtomicBool,
    /// put 前的人为延迟（毫秒），用于超时测试
    put_delay_ms: AtomicU64,
}

impl MemoryBlobStore {
    pub fn new(max_size_bytes: u64) -> Self {
        Self {
            blobs: DashMap::new(),
            max_size_bytes,
            unavailable: AtomicBool::new(false),
            put_delay_ms: AtomicU64::new(0),
        }
    }

    /// 模拟存储端故障（断网、宕机）
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// 模拟写入延迟
    pub fn set_put_delay(&self, delay: Duration) {
        self.put_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.contains_key(key)
    }

    pub fn blob_count(&self) -> usize {
        self.blobs.len()
    }

    fn used_bytes(&self) -> u64 {
        self.blobs.iter().map(|entry| entry.value().len() as u64).sum()
    }
}

#[async_trait]
impl BlobStorePort for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobStoreError> {
        let delay = self.put_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BlobStoreError::Unavailable(
                "simulated outage".to_string(),
            ));
        }

        if key.is_empty() {
            return Err(BlobStoreError::InvalidKey(key.to_string()));
        }

        if self.max_size_bytes > 0 {
            let used = self.used_bytes();
            if used + bytes.len() as u64 > self.max_size_bytes {
                return Err(BlobStoreError::QuotaExceeded {
                    used,
                    limit: self.max_size_bytes,
                });
            }
        }

        self.blobs.insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        Ok(self.blobs.contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
        self.blobs.remove(key);
        Ok(())
    }
}
