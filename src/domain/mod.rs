//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Chapter Context: 有声书章节管理

pub mod chapter;
