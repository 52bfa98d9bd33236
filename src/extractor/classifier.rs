// src/extractor/classifier.rs

use crate::models::{Content, ContentKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub kind: ContentKind,
    pub url: String,
}

/// 显示名称包含 "text" (不区分大小写) 的是文字课，其余都是视频课
pub fn content_kind(display_name: &str) -> ContentKind {
    if display_name.to_lowercase().contains("text") {
        ContentKind::Text
    } else {
        ContentKind::Video
    }
}

/// 纯函数：根据课程 slug 与课程项生成内容类型和播放器地址
pub fn classify(base_url: &str, course_slug: &str, content: &Content) -> Classification {
    let kind = content_kind(&content.display_name);
    let url = format!(
        "{}/{}/{}/{}",
        base_url.trim_end_matches('/'),
        course_slug,
        kind.path_segment(),
        content.slug
    );
    Classification { kind, url }
}
