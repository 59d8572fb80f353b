//! Reconcile Worker - Background Consistency Sweeper
//!
//! 周期性触发对账扫描的后台任务

use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::application::commands::handlers::ReconcileChaptersHandler;
use crate::application::commands::ReconcileChapters;

/// Worker 配置
#[derive(Debug, Clone)]
pub struct ReconcileWorkerConfig {
    /// 扫描间隔（秒）
    pub interval_secs: u64,
}

impl Default for ReconcileWorkerConfig {
    fn default() -> Self {
        Self { interval_secs: 300 }
    }
}

/// 对账 Worker
///
/// 按固定间隔执行对账扫描；单次失败只记日志，下个周期重来
pub struct ReconcileWorker {
    config: ReconcileWorkerConfig,
    handler: ReconcileChaptersHandler,
}

impl ReconcileWorker {
    pub fn new(config: ReconcileWorkerConfig, handler: ReconcileChaptersHandler) -> Self {
        Self { config, handler }
    }

    /// 启动 Worker
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.config.interval_secs,
            "ReconcileWorker started"
        );

        let mut ticker =
            tokio::time::interval(Duration::from_secs(self.config.interval_secs.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match self.handler.handle(ReconcileChapters).await {
                Ok(report) => {
                    if report.missing_blob_failed > 0 || report.stale_pending_failed > 0 {
                        tracing::warn!(
                            missing_blob_failed = report.missing_blob_failed,
                            stale_pending_failed = report.stale_pending_failed,
                            "Reconcile pass repaired inconsistencies"
                        );
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Reconcile pass failed");
                }
            }
        }
    }
}
