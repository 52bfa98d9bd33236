// src/extractor/text.rs

use super::{ContentExtractor, Payload};
use crate::{
    browser::PageDriver,
    error::{ExtractError, ExtractResult},
};
use async_trait::async_trait;
use log::debug;

/// 读取课程播放器中文字课容器的 innerHTML，原样返回
pub struct TextExtractor {
    selector: String,
}

impl TextExtractor {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
        }
    }
}

#[async_trait]
impl ContentExtractor for TextExtractor {
    async fn extract(&self, page: &dyn PageDriver) -> ExtractResult<Payload> {
        let html = page
            .inner_html(&self.selector)
            .await?
            .ok_or_else(|| ExtractError::ElementNotFound(self.selector.clone()))?;
        debug!("从 '{}' 读取到 {} 字节 HTML", self.selector, html.len());
        Ok(Payload::Html(html))
    }
}
