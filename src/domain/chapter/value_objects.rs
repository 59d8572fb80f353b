//! Chapter Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 标题最大长度（字符数）
pub const MAX_TITLE_LENGTH: usize = 200;

/// 章节序号上限
pub const MAX_ORDER_INDEX: u32 = 10_000;

/// 章节标题
///
/// 不变量: 去除首尾空白后非空，且不超过 200 字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterTitle(String);

impl ChapterTitle {
    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into();
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err("标题不能为空");
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err("标题长度不能超过200字符");
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ChapterTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 章节在书内的序号
///
/// 不变量: 0 <= index <= MAX_ORDER_INDEX，同一本书内唯一（由存储层约束裁决）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderIndex(u32);

impl OrderIndex {
    pub fn new(index: u32) -> Result<Self, &'static str> {
        if index > MAX_ORDER_INDEX {
            return Err("章节序号超出上限");
        }
        Ok(Self(index))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for OrderIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Blob 存储键
///
/// 只从服务端分配的标识派生（章节 id + 上传代次），绝不包含用户输入，
/// 避免键冲突和路径穿越
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKey(String);

impl StorageKey {
    /// 从章节 id 和上传代次派生存储键
    pub fn derive(chapter_id: Uuid, revision: i64) -> Self {
        Self(format!("audio/{}/{}.bin", chapter_id, revision))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
