//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Blob 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 对账扫描配置
    #[serde(default)]
    pub reconcile: ReconcileConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            reconcile: ReconcileConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/chapterbox.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// Blob 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// blob 存储根目录
    #[serde(default = "default_blob_dir")]
    pub blob_dir: PathBuf,

    /// 最大存储空间（字节），0 表示不限制
    #[serde(default)]
    pub max_size_bytes: u64,

    /// 单次 blob 写入的超时时间（秒）
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
}

fn default_blob_dir() -> PathBuf {
    PathBuf::from("data/blobs")
}

fn default_upload_timeout() -> u64 {
    30
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            blob_dir: default_blob_dir(),
            max_size_bytes: 0,
            upload_timeout_secs: default_upload_timeout(),
        }
    }
}

/// 对账扫描配置
#[derive(Debug, Clone, Deserialize)]
pub struct ReconcileConfig {
    /// 是否启用后台对账
    #[serde(default = "default_reconcile_enabled")]
    pub enabled: bool,

    /// 扫描间隔（秒）
    #[serde(default = "default_reconcile_interval")]
    pub interval_secs: u64,

    /// pending 记录的陈旧阈值（秒），超过视为创建中途崩溃
    #[serde(default = "default_pending_stale")]
    pub pending_stale_secs: u64,
}

fn default_reconcile_enabled() -> bool {
    true
}

fn default_reconcile_interval() -> u64 {
    300 // 5 分钟
}

fn default_pending_stale() -> u64 {
    900 // 15 分钟
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            enabled: default_reconcile_enabled(),
            interval_secs: default_reconcile_interval(),
            pending_stale_secs: default_pending_stale(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
