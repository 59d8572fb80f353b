//! Chapter Command Handlers
//!
//! 章节上传编排核心：记录与 blob 跨两个独立失败系统的一致性
//! 由步骤顺序保证（先记录后 blob，删除时先 blob 后记录），
//! 残留的不一致窗口交给对账扫描修复

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::application::commands::{
    CreateChapter, DeleteChapter, ReplaceChapterAudio, RetryChapterUpload, UpdateChapter,
};
use crate::application::error::ChapterError;
use crate::application::ports::{
    BlobStoreError, BlobStorePort, ChapterRecord, ChapterRepositoryPort, ChapterStatus,
    RepositoryError,
};
use crate::domain::chapter::{ChapterTitle, OrderIndex, StorageKey};

/// 带超时的 blob 写入；超时与写入失败同等对待
async fn put_with_timeout(
    blob_store: &dyn BlobStorePort,
    key: &StorageKey,
    bytes: &[u8],
    timeout: Duration,
) -> Result<(), BlobStoreError> {
    match tokio::time::timeout(timeout, blob_store.put(key.as_str(), bytes)).await {
        Ok(result) => result,
        Err(_) => Err(BlobStoreError::Unavailable(format!(
            "put timed out after {}ms",
            timeout.as_millis()
        ))),
    }
}

// ============================================================================
// CreateChapter
// ============================================================================

/// CreateChapter Handler
///
/// 工作流:
/// 1. 校验标题和序号
/// 2. 插入 pending 记录（序号冲突在此失败，不写 blob）
/// 3. 从章节 id 派生存储键
/// 4. 写 blob；成功则置 ready，失败则置 failed 并保留记录供重试
pub struct CreateChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    blob_store: Arc<dyn BlobStorePort>,
    upload_timeout: Duration,
}

impl CreateChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        blob_store: Arc<dyn BlobStorePort>,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            chapter_repo,
            blob_store,
            upload_timeout,
        }
    }

    pub async fn handle(&self, command: CreateChapter) -> Result<ChapterRecord, ChapterError> {
        let title = ChapterTitle::new(&command.title).map_err(ChapterError::validation)?;
        let order_index = OrderIndex::new(command.order_index).map_err(ChapterError::validation)?;

        let chapter_id = Uuid::new_v4();
        let now = Utc::now();

        let mut chapter = ChapterRecord {
            id: chapter_id,
            book_id: command.book_id,
            order_index: order_index.value(),
            title: title.into_string(),
            storage_key: None,
            revision: 1,
            status: ChapterStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        // 唯一性由存储层的约束裁决；冲突是正常结果而不是 bug
        match self.chapter_repo.insert(&chapter).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                return Err(ChapterError::DuplicateOrder(format!(
                    "order_index {} already taken for book {}",
                    command.order_index, command.book_id
                )));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            chapter_id = %chapter_id,
            book_id = %command.book_id,
            order_index = command.order_index,
            "Chapter created (pending)"
        );

        let key = StorageKey::derive(chapter_id, chapter.revision);

        match put_with_timeout(
            self.blob_store.as_ref(),
            &key,
            &command.bytes,
            self.upload_timeout,
        )
        .await
        {
            Ok(()) => {
                self.chapter_repo
                    .update_status(
                        chapter_id,
                        ChapterStatus::Ready,
                        Some(key.as_str()),
                        chapter.revision,
                    )
                    .await?;

                tracing::info!(
                    chapter_id = %chapter_id,
                    storage_key = %key,
                    size = command.bytes.len(),
                    "Chapter upload completed (ready)"
                );

                chapter.status = ChapterStatus::Ready;
                chapter.storage_key = Some(key.into_string());
                chapter.updated_at = Utc::now();
                Ok(chapter)
            }
            Err(source) => {
                // 绝不把记录留在 pending；标记失败也失败时由对账扫描兜底
                if let Err(e) = self
                    .chapter_repo
                    .update_status(chapter_id, ChapterStatus::Failed, None, chapter.revision)
                    .await
                {
                    tracing::error!(
                        chapter_id = %chapter_id,
                        error = %e,
                        "Failed to mark chapter failed after upload error"
                    );
                }

                tracing::warn!(
                    chapter_id = %chapter_id,
                    error = %source,
                    "Chapter upload failed"
                );

                Err(ChapterError::UploadFailed { source })
            }
        }
    }
}

// ============================================================================
// RetryChapterUpload
// ============================================================================

/// RetryChapterUpload Handler
///
/// 对 failed 章节重放上传步骤；存储键从同一 id/代次重新派生，
/// 会覆盖半途而废的上次写入
pub struct RetryChapterUploadHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    blob_store: Arc<dyn BlobStorePort>,
    upload_timeout: Duration,
}

impl RetryChapterUploadHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        blob_store: Arc<dyn BlobStorePort>,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            chapter_repo,
            blob_store,
            upload_timeout,
        }
    }

    pub async fn handle(&self, command: RetryChapterUpload) -> Result<ChapterRecord, ChapterError> {
        let mut chapter = self
            .chapter_repo
            .find_by_id(command.chapter_id)
            .await?
            .ok_or(ChapterError::NotFound(command.chapter_id))?;

        if chapter.status != ChapterStatus::Failed {
            return Err(ChapterError::invalid_state(
                ChapterStatus::Failed,
                chapter.status,
            ));
        }

        let key = StorageKey::derive(chapter.id, chapter.revision);

        match put_with_timeout(
            self.blob_store.as_ref(),
            &key,
            &command.bytes,
            self.upload_timeout,
        )
        .await
        {
            Ok(()) => {
                self.chapter_repo
                    .update_status(
                        chapter.id,
                        ChapterStatus::Ready,
                        Some(key.as_str()),
                        chapter.revision,
                    )
                    .await?;

                tracing::info!(
                    chapter_id = %chapter.id,
                    storage_key = %key,
                    "Chapter upload retried (ready)"
                );

                chapter.status = ChapterStatus::Ready;
                chapter.storage_key = Some(key.into_string());
                chapter.updated_at = Utc::now();
                Ok(chapter)
            }
            Err(source) => {
                tracing::warn!(
                    chapter_id = %chapter.id,
                    error = %source,
                    "Chapter upload retry failed"
                );
                Err(ChapterError::UploadFailed { source })
            }
        }
    }
}

// ============================================================================
// ReplaceChapterAudio
// ============================================================================

/// ReplaceChapterAudio Handler
///
/// 只对 ready 章节有效。新 blob 写到下一代次的键，写成功后才切换记录，
/// 最后尽力删除旧 blob；期间对外不暴露任何中间状态
pub struct ReplaceChapterAudioHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    blob_store: Arc<dyn BlobStorePort>,
    upload_timeout: Duration,
}

impl ReplaceChapterAudioHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        blob_store: Arc<dyn BlobStorePort>,
        upload_timeout: Duration,
    ) -> Self {
        Self {
            chapter_repo,
            blob_store,
            upload_timeout,
        }
    }

    pub async fn handle(
        &self,
        command: ReplaceChapterAudio,
    ) -> Result<ChapterRecord, ChapterError> {
        let mut chapter = self
            .chapter_repo
            .find_by_id(command.chapter_id)
            .await?
            .ok_or(ChapterError::NotFound(command.chapter_id))?;

        if chapter.status != ChapterStatus::Ready {
            return Err(ChapterError::invalid_state(
                ChapterStatus::Ready,
                chapter.status,
            ));
        }

        let next_revision = chapter.revision + 1;
        let new_key = StorageKey::derive(chapter.id, next_revision);

        match put_with_timeout(
            self.blob_store.as_ref(),
            &new_key,
            &command.bytes,
            self.upload_timeout,
        )
        .await
        {
            Ok(()) => {}
            Err(source) => {
                // 记录和旧 blob 原封不动，章节仍然可播
                tracing::warn!(
                    chapter_id = %chapter.id,
                    error = %source,
                    "Audio replacement upload failed; keeping previous audio"
                );
                return Err(ChapterError::UploadFailed { source });
            }
        }

        self.chapter_repo
            .update_status(
                chapter.id,
                ChapterStatus::Ready,
                Some(new_key.as_str()),
                next_revision,
            )
            .await?;

        // 旧 blob 删除失败只会留下孤儿文件，不影响一致性
        if let Some(old_key) = &chapter.storage_key {
            if let Err(e) = self.blob_store.delete(old_key).await {
                tracing::warn!(
                    chapter_id = %chapter.id,
                    storage_key = %old_key,
                    error = %e,
                    "Failed to delete replaced blob"
                );
            }
        }

        tracing::info!(
            chapter_id = %chapter.id,
            storage_key = %new_key,
            revision = next_revision,
            "Chapter audio replaced"
        );

        chapter.revision = next_revision;
        chapter.storage_key = Some(new_key.into_string());
        chapter.updated_at = Utc::now();
        Ok(chapter)
    }
}

// ============================================================================
// UpdateChapter
// ============================================================================

/// UpdateChapter Handler - 元数据更新，不触碰状态和 blob
pub struct UpdateChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
}

impl UpdateChapterHandler {
    pub fn new(chapter_repo: Arc<dyn ChapterRepositoryPort>) -> Self {
        Self { chapter_repo }
    }

    pub async fn handle(&self, command: UpdateChapter) -> Result<ChapterRecord, ChapterError> {
        let mut chapter = self
            .chapter_repo
            .find_by_id(command.chapter_id)
            .await?
            .ok_or(ChapterError::NotFound(command.chapter_id))?;

        let title = match command.title {
            Some(t) => ChapterTitle::new(&t)
                .map_err(ChapterError::validation)?
                .into_string(),
            None => chapter.title.clone(),
        };
        let order_index = match command.order_index {
            Some(i) => OrderIndex::new(i)
                .map_err(ChapterError::validation)?
                .value(),
            None => chapter.order_index,
        };

        match self
            .chapter_repo
            .update_metadata(chapter.id, &title, order_index)
            .await
        {
            Ok(()) => {}
            Err(RepositoryError::Conflict(_)) => {
                return Err(ChapterError::DuplicateOrder(format!(
                    "order_index {} already taken for book {}",
                    order_index, chapter.book_id
                )));
            }
            Err(RepositoryError::NotFound(_)) => {
                return Err(ChapterError::NotFound(chapter.id));
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            chapter_id = %chapter.id,
            order_index = order_index,
            "Chapter metadata updated"
        );

        chapter.title = title;
        chapter.order_index = order_index;
        chapter.updated_at = Utc::now();
        Ok(chapter)
    }
}

// ============================================================================
// DeleteChapter
// ============================================================================

/// DeleteChapter Handler
///
/// 先删 blob 再删记录：中途崩溃最多留下一条指向缺失 blob 的记录，
/// 由对账扫描修复；反过来则会永久泄漏 blob
pub struct DeleteChapterHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    blob_store: Arc<dyn BlobStorePort>,
}

impl DeleteChapterHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        blob_store: Arc<dyn BlobStorePort>,
    ) -> Self {
        Self {
            chapter_repo,
            blob_store,
        }
    }

    pub async fn handle(&self, command: DeleteChapter) -> Result<(), ChapterError> {
        let chapter = self
            .chapter_repo
            .find_by_id(command.chapter_id)
            .await?
            .ok_or(ChapterError::NotFound(command.chapter_id))?;

        if let Some(key) = &chapter.storage_key {
            // blob 删除失败则中止，记录保留，整个删除可重放
            self.blob_store
                .delete(key)
                .await
                .map_err(ChapterError::Storage)?;
        }

        self.chapter_repo.delete(chapter.id).await?;

        tracing::info!(
            chapter_id = %chapter.id,
            book_id = %chapter.book_id,
            "Chapter deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::storage::MemoryBlobStore;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteChapterRepository,
    };

    const UPLOAD_TIMEOUT: Duration = Duration::from_secs(5);

    async fn setup() -> (Arc<dyn ChapterRepositoryPort>, Arc<MemoryBlobStore>) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo: Arc<dyn ChapterRepositoryPort> = Arc::new(SqliteChapterRepository::new(pool));
        let store = Arc::new(MemoryBlobStore::new(0));
        (repo, store)
    }

    fn create_command(book_id: Uuid, order_index: u32) -> CreateChapter {
        CreateChapter {
            book_id,
            order_index,
            title: "Intro".to_string(),
            bytes: vec![0u8; 1024],
        }
    }

    #[tokio::test]
    async fn test_create_chapter_happy_path() {
        let (repo, store) = setup().await;
        let handler = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);

        let chapter = handler
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap();

        assert_eq!(chapter.status, ChapterStatus::Ready);
        let key = chapter.storage_key.as_deref().unwrap();
        assert!(store.contains(key));

        let stored = repo.find_by_id(chapter.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ChapterStatus::Ready);
        assert!(stored.is_consistent());
    }

    #[tokio::test]
    async fn test_create_duplicate_order_writes_no_blob() {
        let (repo, store) = setup().await;
        let handler = CreateChapterHandler::new(repo, store.clone(), UPLOAD_TIMEOUT);
        let book_id = Uuid::new_v4();

        handler.handle(create_command(book_id, 0)).await.unwrap();
        assert_eq!(store.blob_count(), 1);

        let err = handler
            .handle(create_command(book_id, 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::DuplicateOrder(_)));
        // 第二次尝试不应写任何 blob
        assert_eq!(store.blob_count(), 1);
    }

    #[tokio::test]
    async fn test_same_order_index_in_different_books_allowed() {
        let (repo, store) = setup().await;
        let handler = CreateChapterHandler::new(repo, store, UPLOAD_TIMEOUT);

        handler
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap();
        handler
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_empty_title_rejected_before_any_write() {
        let (repo, store) = setup().await;
        let handler = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let book_id = Uuid::new_v4();

        let err = handler
            .handle(CreateChapter {
                book_id,
                order_index: 0,
                title: "   ".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ChapterError::Validation(_)));
        assert_eq!(store.blob_count(), 0);
        assert!(repo.find_by_book(book_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_creates_exactly_one_wins() {
        let (repo, store) = setup().await;
        let handler = CreateChapterHandler::new(repo, store, UPLOAD_TIMEOUT);
        let book_id = Uuid::new_v4();

        let (a, b) = tokio::join!(
            handler.handle(create_command(book_id, 7)),
            handler.handle(create_command(book_id, 7)),
        );

        let successes = [&a, &b].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);
        let failure = if a.is_err() { a } else { b };
        assert!(matches!(
            failure.unwrap_err(),
            ChapterError::DuplicateOrder(_)
        ));
    }

    #[tokio::test]
    async fn test_storage_outage_marks_chapter_failed() {
        let (repo, store) = setup().await;
        let handler = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        store.set_unavailable(true);

        let err = handler
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::UploadFailed { .. }));

        // 记录保留为 failed，槽位不丢，可重试
        let chapters = repo.find_by_status(ChapterStatus::Failed).await.unwrap();
        assert_eq!(chapters.len(), 1);
        assert!(chapters[0].storage_key.is_none());
    }

    #[tokio::test]
    async fn test_retry_moves_failed_to_ready() {
        let (repo, store) = setup().await;
        let create = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let retry = RetryChapterUploadHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);

        store.set_unavailable(true);
        create
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap_err();
        let failed = repo.find_by_status(ChapterStatus::Failed).await.unwrap();
        let chapter_id = failed[0].id;

        store.set_unavailable(false);
        let chapter = retry
            .handle(RetryChapterUpload {
                chapter_id,
                bytes: vec![9u8; 512],
            })
            .await
            .unwrap();

        assert_eq!(chapter.status, ChapterStatus::Ready);
        assert!(store.contains(chapter.storage_key.as_deref().unwrap()));
    }

    #[tokio::test]
    async fn test_retry_on_ready_chapter_is_invalid_state() {
        let (repo, store) = setup().await;
        let create = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let retry = RetryChapterUploadHandler::new(repo, store, UPLOAD_TIMEOUT);

        let chapter = create
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap();

        let err = retry
            .handle(RetryChapterUpload {
                chapter_id: chapter.id,
                bytes: vec![1],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_retry_unknown_chapter_not_found() {
        let (repo, store) = setup().await;
        let retry = RetryChapterUploadHandler::new(repo, store, UPLOAD_TIMEOUT);

        let err = retry
            .handle(RetryChapterUpload {
                chapter_id: Uuid::new_v4(),
                bytes: vec![1],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_blob_and_record() {
        let (repo, store) = setup().await;
        let create = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let delete = DeleteChapterHandler::new(repo.clone(), store.clone());

        let chapter = create
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap();
        let key = chapter.storage_key.clone().unwrap();

        delete
            .handle(DeleteChapter {
                chapter_id: chapter.id,
            })
            .await
            .unwrap();

        assert!(!store.contains(&key));
        assert!(repo.find_by_id(chapter.id).await.unwrap().is_none());

        // 第二次删除：记录已不存在
        let err = delete
            .handle(DeleteChapter {
                chapter_id: chapter.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_failed_chapter_without_blob() {
        let (repo, store) = setup().await;
        let create = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let delete = DeleteChapterHandler::new(repo.clone(), store.clone());

        store.set_unavailable(true);
        create
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap_err();
        let chapter_id = repo.find_by_status(ChapterStatus::Failed).await.unwrap()[0].id;

        store.set_unavailable(false);
        delete.handle(DeleteChapter { chapter_id }).await.unwrap();
        assert!(repo.find_by_id(chapter_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_replace_audio_swaps_to_next_revision() {
        let (repo, store) = setup().await;
        let create = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let replace = ReplaceChapterAudioHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);

        let chapter = create
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap();
        let old_key = chapter.storage_key.clone().unwrap();

        let replaced = replace
            .handle(ReplaceChapterAudio {
                chapter_id: chapter.id,
                bytes: vec![7u8; 2048],
            })
            .await
            .unwrap();

        assert_eq!(replaced.status, ChapterStatus::Ready);
        assert_eq!(replaced.revision, 2);
        let new_key = replaced.storage_key.as_deref().unwrap();
        assert_ne!(new_key, old_key);
        assert!(store.contains(new_key));
        assert!(!store.contains(&old_key));
    }

    #[tokio::test]
    async fn test_replace_audio_failure_preserves_old_blob() {
        let (repo, store) = setup().await;
        let create = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let replace = ReplaceChapterAudioHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);

        let chapter = create
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap();
        let old_key = chapter.storage_key.clone().unwrap();

        store.set_unavailable(true);
        let err = replace
            .handle(ReplaceChapterAudio {
                chapter_id: chapter.id,
                bytes: vec![7u8; 2048],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::UploadFailed { .. }));

        // 旧 blob 和记录原封不动
        assert!(store.contains(&old_key));
        let stored = repo.find_by_id(chapter.id).await.unwrap().unwrap();
        assert_eq!(stored.status, ChapterStatus::Ready);
        assert_eq!(stored.revision, 1);
        assert_eq!(stored.storage_key.as_deref(), Some(old_key.as_str()));
    }

    #[tokio::test]
    async fn test_replace_audio_on_failed_chapter_is_invalid_state() {
        let (repo, store) = setup().await;
        let create = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let replace = ReplaceChapterAudioHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);

        store.set_unavailable(true);
        create
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap_err();
        let chapter_id = repo.find_by_status(ChapterStatus::Failed).await.unwrap()[0].id;
        store.set_unavailable(false);

        let err = replace
            .handle(ReplaceChapterAudio {
                chapter_id,
                bytes: vec![1],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::InvalidState { .. }));
    }

    #[tokio::test]
    async fn test_update_metadata() {
        let (repo, store) = setup().await;
        let create = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let update = UpdateChapterHandler::new(repo.clone());

        let chapter = create
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap();

        let updated = update
            .handle(UpdateChapter {
                chapter_id: chapter.id,
                title: Some("Chapter One".to_string()),
                order_index: Some(3),
            })
            .await
            .unwrap();

        assert_eq!(updated.title, "Chapter One");
        assert_eq!(updated.order_index, 3);
        // 状态和存储键不受元数据更新影响
        assert_eq!(updated.status, ChapterStatus::Ready);
        assert_eq!(updated.storage_key, chapter.storage_key);
    }

    #[tokio::test]
    async fn test_update_metadata_order_collision() {
        let (repo, store) = setup().await;
        let create = CreateChapterHandler::new(repo.clone(), store.clone(), UPLOAD_TIMEOUT);
        let update = UpdateChapterHandler::new(repo.clone());
        let book_id = Uuid::new_v4();

        create.handle(create_command(book_id, 0)).await.unwrap();
        let second = create.handle(create_command(book_id, 1)).await.unwrap();

        let err = update
            .handle(UpdateChapter {
                chapter_id: second.id,
                title: None,
                order_index: Some(0),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::DuplicateOrder(_)));
    }

    #[tokio::test]
    async fn test_upload_timeout_treated_as_failure() {
        let (repo, store) = setup().await;
        store.set_put_delay(Duration::from_millis(200));
        let handler =
            CreateChapterHandler::new(repo.clone(), store.clone(), Duration::from_millis(10));

        let err = handler
            .handle(create_command(Uuid::new_v4(), 0))
            .await
            .unwrap_err();
        assert!(matches!(err, ChapterError::UploadFailed { .. }));

        let failed = repo.find_by_status(ChapterStatus::Failed).await.unwrap();
        assert_eq!(failed.len(), 1);
    }
}
