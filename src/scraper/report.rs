// src/scraper/report.rs

use crate::{error::ExtractError, models::ContentKind, symbols, ui};
use colored::*;
use log::{info, warn};
use std::{collections::BTreeMap, fmt};

/// 课程项在哪一步失败
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ItemStage {
    Navigate,
    Stabilize,
    Extract,
    Save,
}

impl ItemStage {
    pub fn label(self) -> &'static str {
        match self {
            ItemStage::Navigate => "导航",
            ItemStage::Stabilize => "等待页面稳定",
            ItemStage::Extract => "提取内容",
            ItemStage::Save => "保存文件",
        }
    }
}

impl fmt::Display for ItemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug)]
pub struct FailedItem {
    pub index: usize,
    pub name: String,
    pub kind: ContentKind,
    pub stage: ItemStage,
    pub error: ExtractError,
}

/// 一次运行的统计，只用于终端报告，不写入结果清单
#[derive(Debug, Default)]
pub struct ScrapeReport {
    total: usize,
    videos: usize,
    texts: usize,
    failures: Vec<FailedItem>,
}

impl ScrapeReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, kind: ContentKind) {
        match kind {
            ContentKind::Video => self.videos += 1,
            ContentKind::Text => self.texts += 1,
        }
    }

    pub fn record_failure(&mut self, failure: FailedItem) {
        warn!(
            "课程项 #{} '{}' 在{}阶段失败: {}",
            failure.index, failure.name, failure.stage, failure.error
        );
        self.failures.push(failure);
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn succeeded(&self) -> usize {
        self.videos + self.texts
    }

    pub fn failures(&self) -> &[FailedItem] {
        &self.failures
    }

    pub fn print_report(&self) {
        info!(
            "抓取报告: Total={}, Succeeded={} (Video={}, Text={}), Failed={}",
            self.total(),
            self.succeeded(),
            self.videos,
            self.texts,
            self.failures.len()
        );

        if !self.failures.is_empty() {
            ui::print_sub_header("失败详情");
            let mut grouped: BTreeMap<ItemStage, Vec<&FailedItem>> = BTreeMap::new();
            for failure in &self.failures {
                grouped.entry(failure.stage).or_default().push(failure);
            }
            for (stage, items) in grouped {
                println!(
                    "\n{} {} ({}个):",
                    *symbols::ERROR,
                    format!("{}失败", stage).red(),
                    items.len()
                );
                for item in items {
                    println!(
                        "  - #{} {} ({}): {}",
                        item.index, item.name, item.kind, item.error
                    );
                }
            }
        }

        ui::print_sub_header("任务总结");
        if self.failures.is_empty() {
            println!(
                "{} 所有 {} 个课程项均已成功处理 (视频 {}，文字 {})。",
                *symbols::OK,
                self.total(),
                self.videos,
                self.texts
            );
        } else {
            println!(
                "{} | {} | {} | {}",
                format!("成功: {}/{}", self.succeeded(), self.total()).green(),
                format!("视频: {}", self.videos).green(),
                format!("文字: {}", self.texts).green(),
                format!("失败: {}", self.failures.len()).red()
            );
        }
    }
}
