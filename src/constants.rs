// src/constants.rs

pub const UI_WIDTH: usize = 88;
pub const PROGRESS_NAME_WIDTH: usize = 48;
pub const CONFIG_DIR_NAME: &str = concat!(".", clap::crate_name!());
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const LOG_FILE_NAME: &str = concat!(clap::crate_name!(), ".log");
pub const LOG_FALLBACK_FILE_NAME: &str = "fallback.log";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const JSONS_DIR: &str = "jsons";

pub mod site {
    pub const BASE_URL: &str = "https://courses.ardanlabs.com/courses/take";
    pub const COOKIE_DOMAIN: &str = "courses.ardanlabs.com";
    pub const COOKIE_NAME: &str = "remember_user_token";
    pub const CONTENT_SELECTOR: &str = ".course-player__content-inner";
    pub const SCRIPT_SELECTOR: &str = "script";
    pub const FRAME_SELECTOR: &str = "iframe";
    pub const EMBED_HOST: &str = "fast.wistia.com";
}

pub mod timing {
    pub const STABLE_TIMEOUT_SECS: u64 = 5;
    pub const SETTLE_MILLIS: u64 = 1000;
    pub const POLL_MILLIS: u64 = 250;
    pub const FRAME_CONTEXT_WAIT_MILLIS: u64 = 3000;
    pub const NAVIGATION_TIMEOUT_SECS: u64 = 30;
    pub const ITEM_DELAY_SECS: u64 = 2;
    pub const LAUNCH_TIMEOUT_SECS: u64 = 20;
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;
}

pub const HELP_COOKIE_GUIDE: &str = r#"
1. 使用浏览器登录 https://courses.ardanlabs.com
2. 打开开发者工具 (F12 / Cmd+Opt+I)，切换到 "Application" (应用) 标签页。
3. 在 Cookies -> https://courses.ardanlabs.com 中找到 remember_user_token。
4. 复制它的值，通过 --cookie 传入。"#;
