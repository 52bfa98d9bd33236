// src/cli.rs

use crate::constants;
use clap::{Parser, ValueEnum, command, crate_version};
use std::path::PathBuf;

/// 定义日志输出级别
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    version = crate_version!(),
    about,
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
)]
pub struct Cli {
    // --- 必填参数 (Required) ---
    /// remember_user_token Cookie 的值
    #[arg(short, long, help_heading = "Required")]
    pub cookie: String,
    /// 包含课程元数据的 response.json 文件路径
    #[arg(short, long, value_name = "FILE", help_heading = "Required")]
    pub response: PathBuf,

    // --- 运行选项 (Options) ---
    /// 输出根目录 (jsons/ 与课程目录都会创建在这里)
    #[arg(short, long, value_name = "DIR", default_value_os_t = PathBuf::from(constants::DEFAULT_OUTPUT_DIR), help_heading = "Options")]
    pub output: PathBuf,
    /// 指定 JSON 配置文件 (默认读取 ~/.ardan-scraper/config.json，如存在)
    #[arg(long, value_name = "FILE", help_heading = "Options")]
    pub config: Option<PathBuf>,
    /// 显示浏览器窗口 (默认无头模式)
    #[arg(long, action = clap::ArgAction::SetTrue, help_heading = "Options")]
    pub show_browser: bool,
    /// 每个课程项处理完后的等待秒数
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64), help_heading = "Options")]
    pub delay: Option<u64>,
    /// 等待页面稳定的最长秒数
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64), help_heading = "Options")]
    pub stable_timeout: Option<u64>,

    // --- 通用选项 (General) ---
    /// 显示此帮助信息并退出
    #[arg(short = 'h', long, action = clap::ArgAction::Help, global = true, help_heading = "General")]
    _help: Option<bool>,
    /// 显示版本信息并退出
    #[arg(short = 'V', long, action = clap::ArgAction::Version, global = true, help_heading = "General")]
    _version: Option<bool>,
    /// (隐藏参数) 设置日志文件的输出级别，用于调试
    #[arg(long, value_enum, default_value_t = LogLevel::Off, global = true, hide = true)]
    pub log_level: LogLevel,
}
