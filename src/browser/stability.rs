// src/browser/stability.rs

use super::PageDriver;
use crate::{
    config::StabilityOptions,
    error::{ExtractError, ExtractResult},
};
use log::{debug, trace};
use serde::Deserialize;
use tokio::time::{Instant, sleep, timeout};

/// 页面活动快照：文档状态、元素数量、已发起的资源请求数
const ACTIVITY_SNAPSHOT_JS: &str = r#"(() => ({
    readyState: document.readyState,
    nodes: document.getElementsByTagName('*').length,
    resources: performance.getEntriesByType('resource').length
}))()"#;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActivitySnapshot {
    ready_state: String,
    nodes: u64,
    resources: u64,
}

impl ActivitySnapshot {
    fn is_complete(&self) -> bool {
        self.ready_state == "complete"
    }
}

/// 阻塞直到页面活动在 `settle` 时间内保持不变，整体最多等待 `timeout`。
/// 超时是明确的失败，交给调用方处理。
pub async fn wait_stable(page: &dyn PageDriver, options: &StabilityOptions) -> ExtractResult<()> {
    let started = Instant::now();
    timeout(options.timeout, settle(page, options))
        .await
        .map_err(|_| ExtractError::StabilityTimeout(options.timeout))?;
    debug!("页面在 {:?} 后稳定", started.elapsed());
    Ok(())
}

async fn settle(page: &dyn PageDriver, options: &StabilityOptions) {
    let mut previous: Option<ActivitySnapshot> = None;
    let mut quiet_since = Instant::now();

    loop {
        // 导航刚结束时执行上下文可能正在切换，取快照失败视为"仍在变化"
        let current = match page.evaluate(ACTIVITY_SNAPSHOT_JS).await {
            Ok(value) => serde_json::from_value::<ActivitySnapshot>(value)
                .map_err(|e| trace!("无法解析页面活动快照: {}", e))
                .ok(),
            Err(e) => {
                trace!("获取页面活动快照失败: {}", e);
                None
            }
        };

        let now = Instant::now();
        match (&previous, &current) {
            (Some(prev), Some(cur)) if prev == cur && cur.is_complete() => {
                if now.duration_since(quiet_since) >= options.settle {
                    return;
                }
            }
            _ => quiet_since = now,
        }
        trace!("页面活动快照: {:?}", current);
        previous = current;

        sleep(options.poll_interval).await;
    }
}
