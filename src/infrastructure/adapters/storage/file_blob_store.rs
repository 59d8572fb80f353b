//! File Blob Store - 文件系统 blob 存储实现
//!
//! 实现 BlobStorePort trait，键直接映射为 base_dir 下的相对路径

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{BlobStoreError, BlobStorePort};

/// 文件系统 blob 存储
pub struct FileBlobStore {
    /// 存储根目录
    base_dir: PathBuf,
    /// 最大存储空间（字节），0 表示不限制
    max_size_bytes: u64,
}

impl FileBlobStore {
    /// 创建新的文件存储
    pub async fn new(
        base_dir: impl AsRef<Path>,
        max_size_bytes: u64,
    ) -> Result<Self, BlobStoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // 确保目录存在
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))?;

        Ok(Self {
            base_dir,
            max_size_bytes,
        })
    }

    /// 获取存储根目录
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 校验键并解析为 base_dir 下的路径
    ///
    /// 键由服务端派生，但这里仍拒绝空段、绝对路径和 ".."，
    /// 保证任何键都无法逃出 base_dir
    fn resolve(&self, key: &str) -> Result<PathBuf, BlobStoreError> {
        if key.is_empty() || key.starts_with('/') || key.contains('\\') {
            return Err(BlobStoreError::InvalidKey(key.to_string()));
        }
        if key.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
            return Err(BlobStoreError::InvalidKey(key.to_string()));
        }
        Ok(self.base_dir.join(key))
    }

    /// 统计已用空间（字节）
    async fn used_bytes(&self) -> Result<u64, BlobStoreError> {
        let mut used = 0u64;
        let mut stack = vec![self.base_dir.clone()];

        while let Some(dir) = stack.pop() {
            let mut entries = fs::read_dir(&dir)
                .await
                .map_err(|e| BlobStoreError::IoError(e.to_string()))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| BlobStoreError::IoError(e.to_string()))?
            {
                let path = entry.path();
                if path.is_dir() {
                    stack.push(path);
                } else if let Ok(metadata) = entry.metadata().await {
                    used += metadata.len();
                }
            }
        }

        Ok(used)
    }
}

#[async_trait]
impl BlobStorePort for FileBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobStoreError> {
        let path = self.resolve(key)?;

        if self.max_size_bytes > 0 {
            let used = self.used_bytes().await?;
            if used + bytes.len() as u64 > self.max_size_bytes {
                return Err(BlobStoreError::QuotaExceeded {
                    used,
                    limit: self.max_size_bytes,
                });
            }
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobStoreError::Unavailable(e.to_string()))?;
        }

        fs::write(&path, bytes)
            .await
            .map_err(|e| BlobStoreError::Unavailable(e.to_string()))?;

        tracing::debug!(key = %key, size = bytes.len(), "Blob written");

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        let path = self.resolve(key)?;
        fs::try_exists(&path)
            .await
            .map_err(|e| BlobStoreError::IoError(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
        let path = self.resolve(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key = %key, "Blob deleted");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(BlobStoreError::IoError(e.to_string())),
        }

        // 尝试删除空的父目录
        if let Some(parent) = path.parent() {
            if parent != self.base_dir {
                let _ = fs::remove_dir(parent).await;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_exists_delete() {
        let temp_dir = tempdir().unwrap();
        let store = FileBlobStore::new(temp_dir.path(), 0).await.unwrap();
        let key = "audio/abc/1.bin";

        store.put(key, b"fake audio").await.unwrap();
        assert!(store.exists(key).await.unwrap());

        store.delete(key).await.unwrap();
        assert!(!store.exists(key).await.unwrap());
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_key() {
        let temp_dir = tempdir().unwrap();
        let store = FileBlobStore::new(temp_dir.path(), 0).await.unwrap();
        let key = "audio/abc/1.bin";

        store.put(key, b"first").await.unwrap();
        store.put(key, b"second").await.unwrap();

        let data = fs::read(temp_dir.path().join(key)).await.unwrap();
        assert_eq!(data, b"second");
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let temp_dir = tempdir().unwrap();
        let store = FileBlobStore::new(temp_dir.path(), 0).await.unwrap();

        store.delete("audio/never/1.bin").await.unwrap();
    }

    #[tokio::test]
    async fn test_traversal_keys_rejected() {
        let temp_dir = tempdir().unwrap();
        let store = FileBlobStore::new(temp_dir.path(), 0).await.unwrap();

        for key in ["", "/etc/passwd", "../escape.bin", "audio/../../x", "a//b"] {
            let err = store.put(key, b"x").await.unwrap_err();
            assert!(matches!(err, BlobStoreError::InvalidKey(_)), "key: {}", key);
        }
    }

    #[tokio::test]
    async fn test_quota_exceeded() {
        let temp_dir = tempdir().unwrap();
        let store = FileBlobStore::new(temp_dir.path(), 16).await.unwrap();

        store.put("a.bin", &[0u8; 8]).await.unwrap();
        let err = store.put("b.bin", &[0u8; 16]).await.unwrap_err();
        assert!(matches!(err, BlobStoreError::QuotaExceeded { .. }));
    }
}
