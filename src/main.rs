// src/main.rs

use ardan_scraper::{cli::Cli, constants, error::AppError, logging, run_from_cli, symbols};
use clap::{CommandFactory, FromArgMatches};
use colored::*;
use std::{env, sync::Arc};

#[tokio::main]
async fn main() {
    // 为 Windows 终端启用 ANSI 颜色支持
    #[cfg(windows)]
    {
        colored::control::set_virtual_terminal(true).ok();
    }

    let bin_name = env::var("CARGO_BIN_NAME").unwrap_or_else(|_| "ardan-scraper".to_string());

    let after_help = format!(
        "示例:\n  # 抓取课程，结果写入当前目录\n  {bin} -c <COOKIE> -r response.json\n\n  # 指定输出目录并显示浏览器窗口\n  {bin} -c <COOKIE> -r response.json -o ./courses --show-browser\n\n获取 Cookie:{guide}",
        bin = bin_name,
        guide = constants::HELP_COOKIE_GUIDE
    );

    let cmd = Cli::command().after_help(after_help);
    let args = match Cli::from_arg_matches(&cmd.get_matches()) {
        Ok(args) => Arc::new(args),
        Err(e) => e.exit(),
    };

    logging::init_logger(args.log_level);

    match run_from_cli(args).await {
        Ok(()) => {}
        Err(AppError::UserInterrupt) => {
            println!("\n{} 用户 {} 中断程序，浏览器已关闭。", *symbols::WARN, *symbols::CTRL_C);
            std::process::exit(130);
        }
        Err(e) => {
            log::error!("运行失败: {}", e);
            eprintln!("\n{} {}", *symbols::ERROR, format!("程序执行出错: {}", e).red());
            std::process::exit(1);
        }
    }
}
