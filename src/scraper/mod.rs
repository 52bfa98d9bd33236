// src/scraper/mod.rs

pub mod report;
pub mod storage;

pub use report::{FailedItem, ItemStage, ScrapeReport};
pub use storage::OutputPaths;

use crate::{
    browser::{self, PageDriver},
    config::AppConfig,
    constants,
    error::{ExtractError, ExtractResult},
    extractor::{self, ContentExtractor, Extractors, Payload},
    models::{Content, ContentKind, CourseManifest, ExtractionResult, OutputManifest},
    symbols, ui, utils,
};
use colored::*;
use indicatif::ProgressBar;
use log::{debug, info};
use std::path::PathBuf;
use tokio::time::{sleep, timeout};

/// 单个课程项的处理结果
pub type ItemOutcome = Result<ExtractionResult, (ItemStage, ExtractError)>;

/// `CourseScraper::run` 的产出
#[derive(Debug)]
pub struct ScrapeRun {
    pub output: OutputManifest,
    pub report: ScrapeReport,
}

/// 按清单顺序逐项处理课程：导航 -> 等待稳定 -> 提取 -> (文字课) 保存。
/// 单项失败只记录并跳过，不会中止整个运行。
pub struct CourseScraper<'a> {
    config: &'a AppConfig,
    extractors: Extractors,
    course_dir: PathBuf,
}

impl<'a> CourseScraper<'a> {
    pub fn new(config: &'a AppConfig, course_dir: PathBuf) -> Self {
        Self {
            config,
            extractors: Extractors::new(config),
            course_dir,
        }
    }

    pub async fn run(&self, manifest: &CourseManifest, page: &dyn PageDriver) -> ScrapeRun {
        let total = manifest.contents.len();
        info!("开始抓取课程 '{}'，共 {} 项", manifest.course.name, total);
        let mut report = ScrapeReport::new(total);
        let mut items = Vec::with_capacity(total);
        let pbar = ui::new_items_progress_bar(total as u64, "抓取进度");

        for (index, content) in manifest.contents.iter().enumerate() {
            let classification =
                extractor::classify(&self.config.base_url, &manifest.course.slug, content);
            let kind = classification.kind;
            ui::println_above(
                &pbar,
                format!(
                    "{} 正在处理 {} ({}) ({}/{})",
                    kind.symbol(),
                    utils::truncate_text(&content.name, constants::PROGRESS_NAME_WIDTH),
                    kind,
                    index + 1,
                    total
                ),
            );

            match self
                .process_item(index, content, kind, &classification.url, page, &pbar)
                .await
            {
                Ok(result) => {
                    report.record_success(kind);
                    items.push(result);
                }
                Err((stage, error)) => {
                    ui::println_above(
                        &pbar,
                        format!(
                            "{} {}失败，已跳过: {}",
                            *symbols::WARN,
                            stage,
                            error.to_string().yellow()
                        ),
                    );
                    report.record_failure(FailedItem {
                        index,
                        name: content.name.clone(),
                        kind,
                        stage,
                        error,
                    });
                }
            }
            pbar.inc(1);

            // 无论成败都暂停，降低请求频率
            sleep(self.config.item_delay).await;
        }
        pbar.finish_and_clear();

        ScrapeRun {
            output: OutputManifest::new(manifest.course.name.clone(), items),
            report,
        }
    }

    async fn process_item(
        &self,
        index: usize,
        content: &Content,
        kind: ContentKind,
        url: &str,
        page: &dyn PageDriver,
        pbar: &ProgressBar,
    ) -> ItemOutcome {
        debug!("#{} 导航至 {}", index, url);
        self.navigate(page, url)
            .await
            .map_err(|e| (ItemStage::Navigate, e))?;

        browser::wait_stable(page, &self.config.stability)
            .await
            .map_err(|e| (ItemStage::Stabilize, e))?;

        let payload = self
            .extractors
            .for_kind(kind)
            .extract(page)
            .await
            .map_err(|e| (ItemStage::Extract, e))?;

        match payload {
            Payload::MediaId(media_id) => {
                ui::println_above(
                    pbar,
                    format!("  {} 找到视频 ID: {}", *symbols::OK, media_id.green()),
                );
                Ok(ExtractionResult::video(index, &content.name, media_id))
            }
            Payload::Html(html) => {
                let path = storage::save_html(&self.course_dir, index, &content.name, &html)
                    .map_err(|e| (ItemStage::Save, ExtractError::from(e)))?;
                ui::println_above(
                    pbar,
                    format!("  {} 已保存 HTML 内容到 {}", *symbols::OK, path.display()),
                );
                Ok(ExtractionResult::text(index, &content.name))
            }
        }
    }

    async fn navigate(&self, page: &dyn PageDriver, url: &str) -> ExtractResult<()> {
        let limit = self.config.navigation_timeout;
        timeout(limit, page.navigate(url))
            .await
            .map_err(|_| ExtractError::NavigationTimeout(limit))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        browser::mock::{MockPage, MockPageSpec},
        models::Course,
    };
    use tempfile::tempdir;

    fn content(name: &str, slug: &str, display_name: &str) -> Content {
        Content {
            name: name.to_string(),
            slug: slug.to_string(),
            display_name: display_name.to_string(),
        }
    }

    fn manifest(contents: Vec<Content>) -> CourseManifest {
        CourseManifest {
            course: Course {
                name: "Go Basics".to_string(),
                slug: "go-basics".to_string(),
            },
            contents,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_item_is_skipped_and_indices_are_kept() {
        let dir = tempdir().unwrap();
        let config = AppConfig::default();
        let page = MockPage::new()
            .with_page("/lessons/v0", MockPageSpec::video(&config.embed_host, "id0"))
            .with_page("/lessons/v1", MockPageSpec::failing_navigation("net::ERR_ABORTED"))
            .with_page("/texts/t2", MockPageSpec::text("<h1>t2</h1>"));
        let manifest = manifest(vec![
            content("First", "v0", "Video"),
            content("Second", "v1", "Video"),
            content("Third", "t2", "Text"),
        ]);

        let run = CourseScraper::new(&config, dir.path().to_path_buf())
            .run(&manifest, &page)
            .await;

        let indices: Vec<usize> = run.output.items.iter().map(|i| i.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(run.output.item_count, 2);
        assert_eq!(run.report.failures().len(), 1);
        assert_eq!(run.report.failures()[0].stage, ItemStage::Navigate);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("2_Third.html")).unwrap(),
            "<h1>t2</h1>"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_navigation_times_out() {
        struct Hanging;

        #[async_trait::async_trait]
        impl PageDriver for Hanging {
            async fn navigate(&self, _url: &str) -> ExtractResult<()> {
                std::future::pending().await
            }
            async fn evaluate(&self, _expression: &str) -> ExtractResult<serde_json::Value> {
                unreachable!()
            }
            async fn count_elements(&self, _selector: &str) -> ExtractResult<usize> {
                unreachable!()
            }
            async fn inner_html(&self, _selector: &str) -> ExtractResult<Option<String>> {
                unreachable!()
            }
            async fn evaluate_in_frame(
                &self,
                _frame_selector: &str,
                _expression: &str,
            ) -> ExtractResult<Option<serde_json::Value>> {
                unreachable!()
            }
        }

        let dir = tempdir().unwrap();
        let config = AppConfig::default();
        let run = CourseScraper::new(&config, dir.path().to_path_buf())
            .run(&manifest(vec![content("Stuck", "s", "Video")]), &Hanging)
            .await;

        assert!(run.output.items.is_empty());
        let failure = &run.report.failures()[0];
        assert_eq!(failure.stage, ItemStage::Navigate);
        assert!(matches!(failure.error, ExtractError::NavigationTimeout(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pacing_applies_after_failures_too() {
        let dir = tempdir().unwrap();
        let config = AppConfig::default();
        let page = MockPage::new().with_page("/lessons/bad", MockPageSpec::failing_navigation("x"));
        let manifest = manifest(vec![
            content("A", "bad", "Video"),
            content("B", "bad", "Video"),
        ]);

        let start = tokio::time::Instant::now();
        let run = CourseScraper::new(&config, dir.path().to_path_buf())
            .run(&manifest, &page)
            .await;

        assert_eq!(run.report.failures().len(), 2);
        assert!(start.elapsed() >= config.item_delay * 2);
    }
}
