//! Chapterbox - 有声书章节上传编排系统
//!
//! 进程入口：装配配置、存储适配器和后台对账 worker。
//! HTTP 边界由独立的网关服务承担，通过 application 层的
//! command/query handler 调用本 crate

use std::sync::Arc;

use chapterbox::config::{load_config, print_config};
use chapterbox::infrastructure::adapters::FileBlobStore;
use chapterbox::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteChapterRepository,
};
use chapterbox::infrastructure::worker::{ReconcileWorker, ReconcileWorkerConfig};
use chapterbox::application::commands::handlers::ReconcileChaptersHandler;
use chapterbox::application::ports::{BlobStorePort, ChapterRepositoryPort};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!("{},chapterbox={}", config.log.level, config.log.level);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));
    let builder = tracing_subscriber::fmt().with_env_filter(env_filter);
    if config.log.json {
        builder.json().init();
    } else {
        builder.init();
    }

    tracing::info!("Chapterbox - 有声书章节上传编排系统");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 和 Blob 存储适配器
    let chapter_repo: Arc<dyn ChapterRepositoryPort> =
        Arc::new(SqliteChapterRepository::new(pool));
    let blob_store: Arc<dyn BlobStorePort> = Arc::new(
        FileBlobStore::new(&config.storage.blob_dir, config.storage.max_size_bytes)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to init blob store: {}", e))?,
    );

    // 启动对账 Worker
    if config.reconcile.enabled {
        let handler = ReconcileChaptersHandler::new(
            chapter_repo.clone(),
            blob_store.clone(),
            config.reconcile.pending_stale_secs,
        );
        let worker = ReconcileWorker::new(
            ReconcileWorkerConfig {
                interval_secs: config.reconcile.interval_secs,
            },
            handler,
        );
        tokio::spawn(worker.run());
    }

    tracing::info!("Chapterbox running, press ctrl-c to stop");

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received shutdown signal");

    Ok(())
}
