//! Reconcile Handler
//!
//! 对账扫描：跨系统事务缺位的补偿机制。
//! ready 记录的 blob 丢失、pending 记录超时未完成，都转为 failed，
//! 让人工或调度的重试重新变得可行

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;

use crate::application::commands::ReconcileChapters;
use crate::application::error::ChapterError;
use crate::application::ports::{BlobStorePort, ChapterRepositoryPort, ChapterStatus};

/// 单次对账扫描的变更汇总
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// 检查过的 ready 记录数
    pub ready_checked: usize,
    /// blob 缺失而转 failed 的 ready 记录数
    pub missing_blob_failed: usize,
    /// 超过陈旧阈值而转 failed 的 pending 记录数
    pub stale_pending_failed: usize,
}

/// ReconcileChapters Handler
pub struct ReconcileChaptersHandler {
    chapter_repo: Arc<dyn ChapterRepositoryPort>,
    blob_store: Arc<dyn BlobStorePort>,
    /// pending 记录的陈旧阈值（秒）
    pending_stale_secs: u64,
}

impl ReconcileChaptersHandler {
    pub fn new(
        chapter_repo: Arc<dyn ChapterRepositoryPort>,
        blob_store: Arc<dyn BlobStorePort>,
        pending_stale_secs: u64,
    ) -> Self {
        Self {
            chapter_repo,
            blob_store,
            pending_stale_secs,
        }
    }

    pub async fn handle(
        &self,
        _command: ReconcileChapters,
    ) -> Result<ReconcileReport, ChapterError> {
        let mut report = ReconcileReport::default();

        // 第一遍：ready 记录必须有存在的 blob
        let ready = self
            .chapter_repo
            .find_by_status(ChapterStatus::Ready)
            .await?;

        for chapter in ready {
            report.ready_checked += 1;

            let Some(key) = &chapter.storage_key else {
                // ready 却没有存储键，不变式已破坏，直接转 failed
                self.chapter_repo
                    .update_status(chapter.id, ChapterStatus::Failed, None, chapter.revision)
                    .await?;
                report.missing_blob_failed += 1;
                tracing::warn!(
                    chapter_id = %chapter.id,
                    "Ready chapter without storage key moved to failed"
                );
                continue;
            };

            match self.blob_store.exists(key).await {
                Ok(true) => {}
                Ok(false) => {
                    self.chapter_repo
                        .update_status(chapter.id, ChapterStatus::Failed, None, chapter.revision)
                        .await?;
                    report.missing_blob_failed += 1;
                    tracing::warn!(
                        chapter_id = %chapter.id,
                        storage_key = %key,
                        "Ready chapter with missing blob moved to failed"
                    );
                }
                Err(e) => {
                    // 存储端暂时不可用时跳过，不给健康记录判死刑
                    tracing::warn!(
                        chapter_id = %chapter.id,
                        error = %e,
                        "Blob existence check failed, skipping"
                    );
                }
            }
        }

        // 第二遍：pending 超过陈旧阈值视为创建中途崩溃
        let cutoff = Utc::now() - ChronoDuration::seconds(self.pending_stale_secs as i64);
        let pending = self
            .chapter_repo
            .find_by_status(ChapterStatus::Pending)
            .await?;

        for chapter in pending {
            if chapter.updated_at < cutoff {
                self.chapter_repo
                    .update_status(chapter.id, ChapterStatus::Failed, None, chapter.revision)
                    .await?;
                report.stale_pending_failed += 1;
                tracing::warn!(
                    chapter_id = %chapter.id,
                    updated_at = %chapter.updated_at,
                    "Stale pending chapter moved to failed"
                );
            }
        }

        tracing::info!(
            ready_checked = report.ready_checked,
            missing_blob_failed = report.missing_blob_failed,
            stale_pending_failed = report.stale_pending_failed,
            "Reconcile pass completed"
        );

        Ok(report)
    }
}
