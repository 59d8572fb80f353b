//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：章节上传编排的所有写工作流

mod chapter_commands;
mod reconcile_commands;

pub mod handlers;

pub use chapter_commands::*;
pub use reconcile_commands::*;
