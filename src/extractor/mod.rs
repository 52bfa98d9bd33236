// src/extractor/mod.rs

pub mod classifier;
pub mod text;
pub mod video;

pub use classifier::{Classification, classify};
pub use text::TextExtractor;
pub use video::VideoExtractor;

use crate::{browser::PageDriver, config::AppConfig, error::ExtractResult, models::ContentKind};
use async_trait::async_trait;

/// 提取器的产出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Html(String),
    MediaId(String),
}

/// 在已导航并稳定的页面上提取内容
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, page: &dyn PageDriver) -> ExtractResult<Payload>;
}

/// 每种内容类型对应一个提取器
pub struct Extractors {
    text: TextExtractor,
    video: VideoExtractor,
}

impl Extractors {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            text: TextExtractor::new(config.content_selector.clone()),
            video: VideoExtractor::new(config.frame_selector.clone(), config.embed_host.clone()),
        }
    }

    pub fn for_kind(&self, kind: ContentKind) -> &dyn ContentExtractor {
        match kind {
            ContentKind::Text => &self.text,
            ContentKind::Video => &self.video,
        }
    }
}
