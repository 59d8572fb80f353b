//! Chapter Commands

use uuid::Uuid;

/// 创建章节命令
///
/// 先插入 pending 记录占住 (book_id, order_index) 槽位，再写 blob
#[derive(Debug, Clone)]
pub struct CreateChapter {
    pub book_id: Uuid,
    pub order_index: u32,
    pub title: String,
    pub bytes: Vec<u8>,
}

/// 重试上传命令
///
/// 只对 failed 状态的章节有效，复用原记录和原存储键
#[derive(Debug, Clone)]
pub struct RetryChapterUpload {
    pub chapter_id: Uuid,
    pub bytes: Vec<u8>,
}

/// 替换已就绪章节的音频命令
///
/// 保留旧 blob 直到新 blob 写入成功（preserve-then-swap）
#[derive(Debug, Clone)]
pub struct ReplaceChapterAudio {
    pub chapter_id: Uuid,
    pub bytes: Vec<u8>,
}

/// 更新章节元数据命令（不触碰状态和存储键）
#[derive(Debug, Clone)]
pub struct UpdateChapter {
    pub chapter_id: Uuid,
    pub title: Option<String>,
    pub order_index: Option<u32>,
}

/// 删除章节命令（先删 blob 再删记录）
#[derive(Debug, Clone)]
pub struct DeleteChapter {
    pub chapter_id: Uuid,
}
