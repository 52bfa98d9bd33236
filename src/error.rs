// src/error.rs

use std::{path::PathBuf, time::Duration};
use thiserror::Error;

/// 致命错误：任何一个都会中止整个运行 (退出码 1)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("无法读取课程清单 '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("无法解析课程清单 '{path}': {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("无法创建目录 '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("浏览器启动失败: {0}")]
    BrowserLaunch(String),
    #[error("设置认证 Cookie 失败: {0}")]
    CookieInjection(String),
    #[error("配置文件错误: {0}")]
    Config(String),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON 解析错误: {0}")]
    Json(#[from] serde_json::Error),
    #[error("用户中断")]
    UserInterrupt,
    #[error("未知错误: {0}")]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

/// 单个课程项的可恢复错误：记录警告后跳过该项，运行继续
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("页面导航失败: {0}")]
    Navigation(String),
    #[error("页面导航超时 ({0:?})")]
    NavigationTimeout(Duration),
    #[error("页面在 {0:?} 内未能稳定")]
    StabilityTimeout(Duration),
    #[error("未找到内容容器 '{0}'")]
    ElementNotFound(String),
    #[error("页面中没有任何 script 元素")]
    NoScriptFound,
    #[error("未找到视频 iframe")]
    NoFrameFound,
    #[error("执行页面脚本失败: {0}")]
    Eval(String),
    #[error("未找到视频 ID")]
    NoIdentifierFound,
    #[error("保存 HTML 内容失败: {0}")]
    Save(#[from] std::io::Error),
}

pub type ExtractResult<T> = Result<T, ExtractError>;

impl From<chromiumoxide::error::CdpError> for ExtractError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ExtractError::Eval(err.to_string())
    }
}
