// src/browser/mod.rs

mod session;
pub mod stability;

#[cfg(any(test, feature = "testing"))]
pub mod mock;

pub use session::{BrowserSession, ChromePage};
pub use stability::wait_stable;

use crate::error::ExtractResult;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// 抓取流程所需的页面操作。真实实现包装 chromiumoxide 的 Page，
/// 测试中使用脚本化的 MockPage。
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// 导航到指定地址，等待主框架加载事件
    async fn navigate(&self, url: &str) -> ExtractResult<()>;

    /// 在主框架中执行表达式，返回按值序列化的结果 (undefined 为 Null)
    async fn evaluate(&self, expression: &str) -> ExtractResult<Value>;

    /// 匹配选择器的元素数量
    async fn count_elements(&self, selector: &str) -> ExtractResult<usize>;

    /// 第一个匹配元素的 innerHTML，元素不存在时返回 None
    async fn inner_html(&self, selector: &str) -> ExtractResult<Option<String>>;

    /// 在第一个匹配 `frame_selector` 的 iframe 文档中执行表达式。
    /// iframe 不存在时返回 Ok(None)。
    async fn evaluate_in_frame(
        &self,
        frame_selector: &str,
        expression: &str,
    ) -> ExtractResult<Option<Value>>;
}

/// 生成 `document.querySelectorAll(...)` 形式的表达式时对选择器做 JS 字符串转义
pub(crate) fn js_string(value: &str) -> String {
    // serde_json 的字符串输出同时是合法的 JS 字符串字面量
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}

/// 每隔 `interval` 调用一次 `probe`，直到它返回 Some 或超过 `limit`。
/// 超时返回 Ok(None)；`probe` 的错误立即返回。
pub(crate) async fn poll_for<T, F, Fut>(
    limit: Duration,
    interval: Duration,
    mut probe: F,
) -> ExtractResult<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ExtractResult<Option<T>>>,
{
    let deadline = Instant::now() + limit;
    loop {
        if let Some(value) = probe().await? {
            return Ok(Some(value));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        sleep(interval).await;
    }
}
