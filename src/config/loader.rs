//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `CHAPTERBOX_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `CHAPTERBOX_DATABASE__PATH=/data/chapterbox.db`
/// - `CHAPTERBOX_STORAGE__BLOB_DIR=/data/blobs`
/// - `CHAPTERBOX_RECONCILE__INTERVAL_SECS=60`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("database.path", "data/chapterbox.db")?
        .set_default("database.max_connections", 5)?
        .set_default("storage.blob_dir", "data/blobs")?
        .set_default("storage.max_size_bytes", 0)?
        .set_default("storage.upload_timeout_secs", 30)?
        .set_default("reconcile.enabled", true)?
        .set_default("reconcile.interval_secs", 300)?
        .set_default("reconcile.pending_stale_secs", 900)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: CHAPTERBOX_
    // 层级分隔符: __ (双下划线)
    builder = builder.add_source(
        Environment::with_prefix("CHAPTERBOX")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证数据库路径
    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    // 验证上传超时
    if config.storage.upload_timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Upload timeout cannot be 0".to_string(),
        ));
    }

    // 验证对账配置
    if config.reconcile.enabled && config.reconcile.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Reconcile interval cannot be 0 when reconcile is enabled".to_string(),
        ));
    }
    if config.reconcile.pending_stale_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Pending staleness threshold cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Database: {}", config.database.path);
    tracing::info!(
        "Database Max Connections: {}",
        config.database.max_connections
    );
    tracing::info!("Blob Directory: {:?}", config.storage.blob_dir);
    tracing::info!("Upload Timeout: {}s", config.storage.upload_timeout_secs);
    tracing::info!("Reconcile Enabled: {}", config.reconcile.enabled);
    if config.reconcile.enabled {
        tracing::info!("Reconcile Interval: {}s", config.reconcile.interval_secs);
        tracing::info!(
            "Pending Stale Threshold: {}s",
            config.reconcile.pending_stale_secs
        );
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
