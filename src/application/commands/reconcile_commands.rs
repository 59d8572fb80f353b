//! Reconcile Commands

/// 对账扫描命令
///
/// 由外部调度器（后台 worker 或运维脚本）周期性触发，
/// 修复记录与 blob 之间的部分失败窗口
#[derive(Debug, Clone)]
pub struct ReconcileChapters;
