//! Worker Layer - Background Task Processing
//!
//! 实现 ReconcileWorker，周期性修复记录与 blob 的不一致

mod reconcile_worker;

pub use reconcile_worker::{ReconcileWorker, ReconcileWorkerConfig};
