// src/browser/session.rs

use super::{PageDriver, js_string, poll_for};
use crate::{
    config::SessionOptions,
    constants::site,
    error::{AppError, AppResult, ExtractError, ExtractResult},
};
use async_trait::async_trait;
use chromiumoxide::{
    Browser, BrowserConfig, Page,
    cdp::{browser_protocol::network::CookieParam, js_protocol::runtime::EvaluateParams},
};
use futures::StreamExt;
use log::{debug, info, warn};
use serde_json::Value;
use std::time::Duration;
use tokio::task::JoinHandle;

const HANDLER_SHUTDOWN: Duration = Duration::from_secs(5);
const FRAME_CONTEXT_POLL: Duration = Duration::from_millis(100);

/// 关闭站点隔离：跨站 iframe (视频播放器) 必须与页面同进程，
/// 否则 chromiumoxide 拿不到它的执行上下文
const DISABLE_SITE_ISOLATION: &str = "--disable-features=IsolateOrigins,site-per-process";

fn launch_args() -> Vec<&'static str> {
    vec![DISABLE_SITE_ISOLATION]
}

/// 独占的浏览器会话：一个 Chromium 进程 + 一个已注入认证 Cookie 的页面。
///
/// 必须调用 `close()` 释放；若因 panic 等原因直接 drop，
/// chromiumoxide 会在后台杀掉子进程。
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: ChromePage,
}

impl BrowserSession {
    pub async fn open(options: &SessionOptions, cookie_value: &str) -> AppResult<Self> {
        let mut builder = BrowserConfig::builder()
            .launch_timeout(options.launch_timeout)
            .request_timeout(options.request_timeout)
            .args(launch_args());
        if !options.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &options.executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(AppError::BrowserLaunch)?;

        info!("启动浏览器 (headless: {})", options.headless);
        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| AppError::BrowserLaunch(e.to_string()))?;

        // CDP 消息循环必须持续被轮询，否则所有页面操作都会挂起
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler 事件错误: {}", e);
                }
            }
            debug!("CDP handler 已退出");
        });

        let page = match Self::prepare_page(&browser, options, cookie_value).await {
            Ok(page) => page,
            Err(e) => {
                // 会话尚未交给调用方，这里负责回收进程
                if let Err(close_err) = browser.close().await {
                    warn!("初始化失败后关闭浏览器出错: {}", close_err);
                }
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(e);
            }
        };

        Ok(Self {
            browser,
            handler_task,
            page: ChromePage {
                page,
                frame_context_wait: options.frame_context_wait,
            },
        })
    }

    async fn prepare_page(
        browser: &Browser,
        options: &SessionOptions,
        cookie_value: &str,
    ) -> AppResult<Page> {
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| AppError::BrowserLaunch(e.to_string()))?;

        let cookie = CookieParam::builder()
            .name(site::COOKIE_NAME)
            .value(cookie_value)
            // about:blank 上无法推断 Cookie 所属站点，必须显式给出 url
            .url(format!("https://{}/", options.cookie_domain))
            .domain(options.cookie_domain.clone())
            .path("/")
            .secure(true)
            .http_only(true)
            .build()
            .map_err(AppError::CookieInjection)?;
        page.set_cookie(cookie)
            .await
            .map_err(|e| AppError::CookieInjection(e.to_string()))?;
        debug!("已为 {} 注入 {} Cookie", options.cookie_domain, site::COOKIE_NAME);

        Ok(page)
    }

    pub fn page(&self) -> &ChromePage {
        &self.page
    }

    /// 关闭浏览器并回收子进程，消耗会话
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        match self.browser.wait().await {
            Ok(status) => debug!("浏览器进程已退出: {:?}", status),
            Err(e) => warn!("等待浏览器进程退出失败: {}", e),
        }
        if tokio::time::timeout(HANDLER_SHUTDOWN, &mut self.handler_task)
            .await
            .is_err()
        {
            debug!("CDP handler 未在 {:?} 内退出，强制终止", HANDLER_SHUTDOWN);
            self.handler_task.abort();
        }
        info!("浏览器会话已关闭");
    }
}

/// chromiumoxide 页面上的 PageDriver 实现
pub struct ChromePage {
    page: Page,
    frame_context_wait: Duration,
}

impl ChromePage {
    async fn evaluate_with(&self, params: EvaluateParams) -> ExtractResult<Value> {
        let result = self.page.evaluate_expression(params).await?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}

/// 第一个匹配元素的 innerHTML；空字符串也是有效内容，只有 null 表示元素不存在
fn inner_html_js(selector: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({}); return el === null ? null : el.innerHTML; }})()",
        js_string(selector)
    )
}

fn html_from_value(value: Value) -> ExtractResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(html) => Ok(Some(html)),
        other => Err(ExtractError::Eval(format!("innerHTML 返回了非字符串结果: {}", other))),
    }
}

fn by_value(expression: &str) -> EvaluateParams {
    EvaluateParams::builder()
        .expression(expression)
        .return_by_value(true)
        .await_promise(true)
        .build()
        .unwrap_or_else(|_| EvaluateParams::new(expression))
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn navigate(&self, url: &str) -> ExtractResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ExtractError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn evaluate(&self, expression: &str) -> ExtractResult<Value> {
        self.evaluate_with(by_value(expression)).await
    }

    async fn count_elements(&self, selector: &str) -> ExtractResult<usize> {
        let expression = format!("document.querySelectorAll({}).length", js_string(selector));
        let value = self.evaluate(&expression).await?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| ExtractError::Eval(format!("元素计数返回了非数字结果: {}", value)))
    }

    async fn inner_html(&self, selector: &str) -> ExtractResult<Option<String>> {
        let value = self.evaluate(&inner_html_js(selector)).await?;
        html_from_value(value)
    }

    async fn evaluate_in_frame(
        &self,
        frame_selector: &str,
        expression: &str,
    ) -> ExtractResult<Option<Value>> {
        let Some(frame_owner) = self
            .page
            .find_elements(frame_selector)
            .await?
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        let frame_id = frame_owner
            .description()
            .await?
            .frame_id
            .ok_or_else(|| ExtractError::Eval("iframe 没有关联的 frame".to_string()))?;
        // iframe 的执行上下文可能在页面稳定后才创建
        let page = &self.page;
        let context_id = poll_for(self.frame_context_wait, FRAME_CONTEXT_POLL, || {
            let frame_id = frame_id.clone();
            async move { Ok::<_, ExtractError>(page.frame_execution_context(frame_id).await?) }
        })
        .await?
        .ok_or_else(|| {
            ExtractError::Eval(format!(
                "iframe 的执行上下文在 {:?} 内未就绪",
                self.frame_context_wait
            ))
        })?;

        let params = EvaluateParams::builder()
            .expression(expression)
            .context_id(context_id)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(ExtractError::Eval)?;
        self.evaluate_with(params).await.map(Some)
    }
}
