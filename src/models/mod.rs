// src/models/mod.rs

pub mod manifest;

pub use manifest::{Content, Course, CourseManifest};

use crate::symbols;
use colored::ColoredString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 课程项的内容类型，由 display_name 推导，不出现在输入中
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Video,
    Text,
}

impl ContentKind {
    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Video => "Video",
            ContentKind::Text => "Text",
        }
    }

    /// 课程播放器 URL 中对应的路径段
    pub fn path_segment(self) -> &'static str {
        match self {
            ContentKind::Video => "lessons",
            ContentKind::Text => "texts",
        }
    }

    pub fn symbol(self) -> &'static ColoredString {
        match self {
            ContentKind::Video => &symbols::VIDEO,
            ContentKind::Text => &symbols::TEXT,
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 单个成功处理的课程项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub index: usize,
    #[serde(
        rename = "dynamic-part",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub dynamic_part: Option<String>,
    pub downloaded: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
}

impl ExtractionResult {
    pub fn video(index: usize, original_name: &str, media_id: String) -> Self {
        Self {
            index,
            dynamic_part: Some(media_id),
            downloaded: false,
            name: item_name(index, original_name),
            kind: ContentKind::Video,
        }
    }

    pub fn text(index: usize, original_name: &str) -> Self {
        Self {
            index,
            dynamic_part: None,
            downloaded: true,
            name: item_name(index, original_name),
            kind: ContentKind::Text,
        }
    }
}

fn item_name(index: usize, original_name: &str) -> String {
    format!("{}_{}", index, original_name)
}

/// 运行结束时写出的结果清单
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputManifest {
    pub name: String,
    #[serde(rename = "item-count")]
    pub item_count: usize,
    pub items: Vec<ExtractionResult>,
}

impl OutputManifest {
    pub fn new(name: impl Into<String>, items: Vec<ExtractionResult>) -> Self {
        Self {
            name: name.into(),
            item_count: items.len(),
            items,
        }
    }
}
