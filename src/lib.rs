//! Chapterbox - 有声书章节上传编排系统
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Chapter Context: 章节元数据校验与存储键派生
//!
//! 应用层 (application/):
//! - Ports: 端口定义（ChapterRepository, BlobStore）
//! - Commands: CQRS 命令处理器（创建、重试、替换、更新、删除、对账）
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - Persistence: SQLite 章节存储
//! - Adapters: 文件系统 / 内存 Blob 存储
//! - Worker: 后台对账扫描
//!
//! 核心一致性设计：章节记录和音频 blob 落在两个独立失败的系统里，
//! 没有跨系统事务。创建先插记录再写 blob，删除先删 blob 再删记录，
//! 崩溃留下的窗口由幂等重试和周期对账扫描收敛。

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
