//! Chapter Context - 章节限界上下文
//!
//! 职责:
//! - 章节元数据的校验规则（标题、序号）
//! - 存储键派生

mod value_objects;

pub use value_objects::{ChapterTitle, OrderIndex, StorageKey, MAX_ORDER_INDEX, MAX_TITLE_LENGTH};
