// src/extractor/video.rs

use super::{ContentExtractor, Payload};
use crate::{
    browser::PageDriver,
    constants::site,
    error::{ExtractError, ExtractResult},
};
use async_trait::async_trait;
use log::{debug, trace};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static MEDIA_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/embed/medias/([^/]+)\.jsonp$").unwrap());

/// 在 iframe 文档中按文档顺序列出所有 script 的 src
const FRAME_SCRIPT_SOURCES_JS: &str =
    "Array.from(document.querySelectorAll('script')).map(s => s.src)";

/// 从视频课页面的嵌入 iframe 中找出视频服务商的媒体 ID。
///
/// 依次检查：页面已有 script -> 存在 iframe -> iframe 内脚本可查询 -> 有匹配的媒体地址。
/// 任何一步失败都以对应的 ExtractError 返回。
pub struct VideoExtractor {
    frame_selector: String,
    embed_host: String,
}

impl VideoExtractor {
    pub fn new(frame_selector: impl Into<String>, embed_host: impl Into<String>) -> Self {
        Self {
            frame_selector: frame_selector.into(),
            embed_host: embed_host.into(),
        }
    }

    /// `https://{embed_host}/embed/medias/{id}.jsonp` 中的 `{id}`
    fn media_id_from_source(&self, src: &str) -> Option<String> {
        let url = Url::parse(src).ok()?;
        if url.scheme() != "https" || url.host_str() != Some(self.embed_host.as_str()) {
            return None;
        }
        MEDIA_PATH_RE
            .captures(url.path())
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .filter(|id| !id.is_empty())
    }

    /// 多个脚本匹配时取文档顺序中的第一个
    pub fn media_id_from_sources<S: AsRef<str>>(&self, sources: &[S]) -> Option<String> {
        sources
            .iter()
            .find_map(|src| self.media_id_from_source(src.as_ref()))
    }
}

#[async_trait]
impl ContentExtractor for VideoExtractor {
    async fn extract(&self, page: &dyn PageDriver) -> ExtractResult<Payload> {
        if page.count_elements(site::SCRIPT_SELECTOR).await? == 0 {
            return Err(ExtractError::NoScriptFound);
        }

        let value = page
            .evaluate_in_frame(&self.frame_selector, FRAME_SCRIPT_SOURCES_JS)
            .await?
            .ok_or(ExtractError::NoFrameFound)?;

        let sources: Vec<String> = serde_json::from_value(value)
            .map_err(|e| ExtractError::Eval(format!("iframe 脚本查询返回了意外的结果: {}", e)))?;
        trace!("iframe 中的脚本: {:?}", sources);

        let media_id = self
            .media_id_from_sources(&sources)
            .ok_or(ExtractError::NoIdentifierFound)?;
        debug!("找到视频 ID: {}", media_id);
        Ok(Payload::MediaId(media_id))
    }
}
