//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod chapter_repo;

pub use database::*;
pub use chapter_repo::*;
