// src/lib.rs

pub mod browser;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod models;
pub mod scraper;
pub mod symbols;
pub mod ui;
pub mod utils;

use crate::{
    browser::BrowserSession,
    cli::Cli,
    config::AppConfig,
    error::{AppError, AppResult},
    scraper::{CourseScraper, OutputPaths, ScrapeRun, storage},
};
use log::{debug, info};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

fn display_path(path: &Path) -> String {
    dunce::canonicalize(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

/// 库的公共入口点，由 `main.rs` 调用。
///
/// 清单读取、目录创建、浏览器启动与结果写出的失败都会中止运行；
/// 单个课程项的失败只会让该项从结果中缺席。
pub async fn run_from_cli(args: Arc<Cli>) -> AppResult<()> {
    debug!("课程清单: {:?}, 输出目录: {:?}", args.response, args.output);
    let config = AppConfig::new(&args)?;
    debug!("加载的应用配置: {:?}", config);

    let manifest = storage::load_manifest(&args.response)?;
    ui::print_header(&format!("课程: {}", manifest.course.name));
    let paths = storage::prepare_output_dirs(&config.output_dir, &manifest.course.name)?;
    ui::info(&format!("输出目录: {}", display_path(&paths.course_dir)));

    ui::info("正在启动浏览器...");
    let session = BrowserSession::open(&config.session, &args.cookie).await?;
    info!("浏览器会话已就绪");

    let scraper = CourseScraper::new(&config, paths.course_dir.clone());
    let outcome = tokio::select! {
        run = scraper.run(&manifest, session.page()) => Some(run),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };
    // 无论是否被中断都关闭浏览器
    session.close().await;

    let run = outcome.ok_or(AppError::UserInterrupt)?;
    finish_run(&paths, run)?;
    Ok(())
}

/// 打印运行报告并写出结果清单，返回清单文件路径
pub fn finish_run(paths: &OutputPaths, run: ScrapeRun) -> AppResult<PathBuf> {
    run.report.print_report();
    let path = storage::save_output_manifest(&paths.jsons_dir, &run.output)?;
    println!(
        "\n{} 成功保存课程数据到 {}",
        *symbols::OK,
        display_path(&path)
    );
    Ok(path)
}
