// src/browser/mock.rs

//! 脚本化的 PageDriver，供单元测试与集成测试 (feature = "testing") 使用。
//! 按 URL 后缀匹配预设的页面行为，无需真实浏览器。
//! 内容容器与 iframe 只响应默认选择器，其它选择器都视为不匹配。

use super::PageDriver;
use crate::{
    constants::site,
    error::{ExtractError, ExtractResult},
};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{
    Mutex,
    atomic::{AtomicU64, AtomicUsize, Ordering},
};

#[derive(Debug, Clone, Default)]
pub struct MockPageSpec {
    navigation_error: Option<String>,
    unstable: bool,
    snapshot_failures: usize,
    content_html: Option<String>,
    script_count: usize,
    frame_scripts: Option<Vec<String>>,
    frame_eval_error: Option<String>,
}

impl MockPageSpec {
    /// 含内容容器的文字课页面
    pub fn text(html: &str) -> Self {
        Self {
            content_html: Some(html.to_string()),
            script_count: 4,
            ..Default::default()
        }
    }

    /// iframe 中带有一个嵌入脚本的视频课页面
    pub fn video(embed_host: &str, media_id: &str) -> Self {
        Self::video_with_frame_scripts(vec![format!(
            "https://{}/embed/medias/{}.jsonp",
            embed_host, media_id
        )])
    }

    pub fn video_with_frame_scripts(scripts: Vec<String>) -> Self {
        Self {
            script_count: 6,
            frame_scripts: Some(scripts),
            ..Default::default()
        }
    }

    /// 空白页面：没有 script、iframe 或内容容器
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn failing_navigation(message: &str) -> Self {
        Self {
            navigation_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn without_frame(mut self) -> Self {
        self.frame_scripts = None;
        self
    }

    pub fn with_frame_eval_error(mut self, message: &str) -> Self {
        self.frame_eval_error = Some(message.to_string());
        self
    }

    /// 页面活动永不停止，稳定等待必然超时
    pub fn unstable(mut self) -> Self {
        self.unstable = true;
        self
    }

    /// 导航后前 n 次取快照失败
    pub fn with_snapshot_failures(mut self, n: usize) -> Self {
        self.snapshot_failures = n;
        self
    }
}

#[derive(Default)]
pub struct MockPage {
    pages: Vec<(String, MockPageSpec)>,
    current: Mutex<Option<MockPageSpec>>,
    visited: Mutex<Vec<String>>,
    snapshot_calls: AtomicUsize,
    ticks: AtomicU64,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册一个页面：导航地址以 `url_suffix` 结尾时使用该行为
    pub fn with_page(mut self, url_suffix: &str, spec: MockPageSpec) -> Self {
        self.pages.push((url_suffix.to_string(), spec));
        self
    }

    /// 按顺序记录的所有导航地址
    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().map(|v| v.clone()).unwrap_or_default()
    }

    fn current(&self) -> ExtractResult<MockPageSpec> {
        self.current
            .lock()
            .ok()
            .and_then(|c| c.clone())
            .ok_or_else(|| ExtractError::Eval("没有已加载的页面".to_string()))
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn navigate(&self, url: &str) -> ExtractResult<()> {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(url.to_string());
        }
        let spec = self
            .pages
            .iter()
            .find(|(suffix, _)| url.ends_with(suffix.as_str()))
            .map(|(_, spec)| spec.clone())
            .ok_or_else(|| ExtractError::Navigation(format!("net::ERR_NAME_NOT_RESOLVED at {}", url)))?;
        if let Some(message) = &spec.navigation_error {
            return Err(ExtractError::Navigation(message.clone()));
        }
        self.snapshot_calls.store(0, Ordering::SeqCst);
        if let Ok(mut current) = self.current.lock() {
            *current = Some(spec);
        }
        Ok(())
    }

    async fn evaluate(&self, _expression: &str) -> ExtractResult<Value> {
        let spec = self.current()?;
        let call = self.snapshot_calls.fetch_add(1, Ordering::SeqCst);
        if call < spec.snapshot_failures {
            return Err(ExtractError::Eval("Execution context was destroyed".to_string()));
        }
        let nodes = if spec.unstable {
            100 + self.ticks.fetch_add(1, Ordering::SeqCst)
        } else {
            100
        };
        Ok(json!({ "readyState": "complete", "nodes": nodes, "resources": 12 }))
    }

    async fn count_elements(&self, selector: &str) -> ExtractResult<usize> {
        let spec = self.current()?;
        Ok(match selector {
            site::SCRIPT_SELECTOR => spec.script_count,
            site::FRAME_SELECTOR => usize::from(spec.frame_scripts.is_some()),
            site::CONTENT_SELECTOR => usize::from(spec.content_html.is_some()),
            _ => 0,
        })
    }

    async fn inner_html(&self, selector: &str) -> ExtractResult<Option<String>> {
        let spec = self.current()?;
        if selector != site::CONTENT_SELECTOR {
            return Ok(None);
        }
        Ok(spec.content_html)
    }

    async fn evaluate_in_frame(
        &self,
        frame_selector: &str,
        _expression: &str,
    ) -> ExtractResult<Option<Value>> {
        let spec = self.current()?;
        if frame_selector != site::FRAME_SELECTOR {
            return Ok(None);
        }
        if let Some(message) = spec.frame_eval_error {
            return Err(ExtractError::Eval(message));
        }
        Ok(spec.frame_scripts.map(|scripts| json!(scripts)))
    }
}
