// src/config.rs

use crate::{
    cli::Cli,
    constants::{self, site, timing},
    error::{AppError, AppResult},
};
use anyhow::{Context, anyhow};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: Option<String>,
    pub cookie_domain: Option<String>,
    pub content_selector: Option<String>,
    pub frame_selector: Option<String>,
    pub embed_host: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TimingConfig {
    pub stable_timeout_secs: Option<u64>,
    pub settle_millis: Option<u64>,
    pub poll_millis: Option<u64>,
    pub navigation_timeout_secs: Option<u64>,
    pub item_delay_secs: Option<u64>,
    pub frame_context_wait_millis: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BrowserFileConfig {
    pub headless: Option<bool>,
    pub executable: Option<PathBuf>,
    pub launch_timeout_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// 配置文件的结构，所有字段均可省略
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExternalConfig {
    pub site: SiteConfig,
    pub timing: TimingConfig,
    pub browser: BrowserFileConfig,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME)
    })
}

/// 显式指定的配置文件必须存在；默认位置的配置文件不存在时使用内置默认值
pub(crate) fn load_external_config(explicit: Option<&Path>) -> AppResult<ExternalConfig> {
    let path = match explicit {
        Some(path) if !path.is_file() => {
            return Err(AppError::Config(format!(
                "配置文件 '{}' 不存在",
                path.display()
            )));
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => {
                debug!("未找到配置文件，使用内置默认配置");
                return Ok(ExternalConfig::default());
            }
        },
    };

    info!("加载配置文件: {}", path.display());
    let content = fs::read_to_string(&path)
        .with_context(|| format!("读取配置文件 '{}' 失败", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| AppError::Config(format!("解析 '{}' 失败: {}", path.display(), e)))
}

#[derive(Debug, Clone)]
pub struct StabilityOptions {
    pub timeout: Duration,
    pub settle: Duration,
    pub poll_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub headless: bool,
    pub executable: Option<PathBuf>,
    pub cookie_domain: String,
    pub launch_timeout: Duration,
    pub request_timeout: Duration,
    /// 等待视频 iframe 执行上下文出现的最长时间
    pub frame_context_wait: Duration,
}

/// 运行时使用的最终配置 (默认值 <- 配置文件 <- 命令行参数)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub content_selector: String,
    pub frame_selector: String,
    pub embed_host: String,
    pub output_dir: PathBuf,
    pub navigation_timeout: Duration,
    pub item_delay: Duration,
    pub stability: StabilityOptions,
    pub session: SessionOptions,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external = load_external_config(args.config.as_deref())?;
        let config = Self::resolve(args, external);
        if url::Url::parse(&config.base_url).is_err() {
            return Err(AppError::Other(anyhow!(
                "无效的站点地址 '{}'",
                config.base_url
            )));
        }
        Ok(config)
    }

    fn resolve(args: &Cli, external: ExternalConfig) -> Self {
        let ExternalConfig { site, timing, browser } = external;
        let secs = |value: Option<u64>, default: u64| Duration::from_secs(value.unwrap_or(default));
        let millis =
            |value: Option<u64>, default: u64| Duration::from_millis(value.unwrap_or(default));

        Self {
            base_url: site.base_url.unwrap_or_else(|| site::BASE_URL.into()),
            content_selector: site
                .content_selector
                .unwrap_or_else(|| site::CONTENT_SELECTOR.into()),
            frame_selector: site
                .frame_selector
                .unwrap_or_else(|| site::FRAME_SELECTOR.into()),
            embed_host: site.embed_host.unwrap_or_else(|| site::EMBED_HOST.into()),
            output_dir: args.output.clone(),
            navigation_timeout: secs(
                timing.navigation_timeout_secs,
                timing::NAVIGATION_TIMEOUT_SECS,
            ),
            item_delay: secs(
                args.delay.or(timing.item_delay_secs),
                timing::ITEM_DELAY_SECS,
            ),
            stability: StabilityOptions {
                timeout: secs(
                    args.stable_timeout.or(timing.stable_timeout_secs),
                    timing::STABLE_TIMEOUT_SECS,
                ),
                settle: millis(timing.settle_millis, timing::SETTLE_MILLIS),
                poll_interval: millis(timing.poll_millis, timing::POLL_MILLIS),
            },
            session: SessionOptions {
                // --show-browser 优先于配置文件
                headless: !args.show_browser && browser.headless.unwrap_or(true),
                executable: browser.executable,
                cookie_domain: site
                    .cookie_domain
                    .unwrap_or_else(|| site::COOKIE_DOMAIN.into()),
                launch_timeout: secs(browser.launch_timeout_secs, timing::LAUNCH_TIMEOUT_SECS),
                request_timeout: secs(browser.request_timeout_secs, timing::REQUEST_TIMEOUT_SECS),
                frame_context_wait: millis(
                    timing.frame_context_wait_millis,
                    timing::FRAME_CONTEXT_WAIT_MILLIS,
                ),
            },
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: site::BASE_URL.to_string(),
            content_selector: site::CONTENT_SELECTOR.to_string(),
            frame_selector: site::FRAME_SELECTOR.to_string(),
            embed_host: site::EMBED_HOST.to_string(),
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            navigation_timeout: Duration::from_secs(timing::NAVIGATION_TIMEOUT_SECS),
            item_delay: Duration::from_secs(timing::ITEM_DELAY_SECS),
            stability: StabilityOptions {
                timeout: Duration::from_secs(timing::STABLE_TIMEOUT_SECS),
                settle: Duration::from_millis(timing::SETTLE_MILLIS),
                poll_interval: Duration::from_millis(timing::POLL_MILLIS),
            },
            session: SessionOptions {
                headless: true,
                executable: None,
                cookie_domain: site::COOKIE_DOMAIN.to_string(),
                launch_timeout: Duration::from_secs(timing::LAUNCH_TIMEOUT_SECS),
                request_timeout: Duration::from_secs(timing::REQUEST_TIMEOUT_SECS),
                frame_context_wait: Duration::from_millis(timing::FRAME_CONTEXT_WAIT_MILLIS),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(extra: &[&str]) -> Cli {
        let mut argv = vec!["ardan-scraper", "-c", "cookie", "-r", "response.json"];
        argv.extend_from_slice(extra);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = AppConfig::resolve(&parse(&[]), ExternalConfig::default());
        assert_eq!(config.base_url, site::BASE_URL);
        assert_eq!(config.item_delay, Duration::from_secs(2));
        assert_eq!(config.stability.timeout, Duration::from_secs(5));
        assert!(config.session.headless);
        assert_eq!(config.session.cookie_domain, "courses.ardanlabs.com");
        assert_eq!(config.session.frame_context_wait, Duration::from_secs(3));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let external: ExternalConfig = serde_json::from_str(
            r#"{
                "site": { "embed_host": "embed.example.com" },
                "timing": { "item_delay_secs": 7, "stable_timeout_secs": 9 },
                "browser": { "headless": true }
            }"#,
        )
        .unwrap();

        let config = AppConfig::resolve(
            &parse(&["--delay", "1", "--show-browser"]),
            external,
        );
        assert_eq!(config.embed_host, "embed.example.com");
        // 命令行优先
        assert_eq!(config.item_delay, Duration::from_secs(1));
        assert!(!config.session.headless);
        // 命令行未指定时使用配置文件
        assert_eq!(config.stability.timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let err = load_external_config(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
