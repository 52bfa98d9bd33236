// tests/pipeline_test.rs

use ardan_scraper::{
    browser::mock::{MockPage, MockPageSpec},
    config::AppConfig,
    finish_run,
    models::{ContentKind, CourseManifest, OutputManifest},
    scraper::{CourseScraper, ItemStage, storage},
};
use serde_json::Value;
use std::{fs, path::Path};
use tempfile::tempdir;

const FIXTURE: &str = "tests/fixtures/response.json";

fn load_fixture() -> CourseManifest {
    storage::load_manifest(Path::new(FIXTURE)).unwrap()
}

/// fixture 对应的站点；`unstable` 中的 slug 页面永远无法稳定
fn site(config: &AppConfig, unstable: &[&str]) -> MockPage {
    let video = |slug: &str, id: &str| {
        let spec = MockPageSpec::video(&config.embed_host, id);
        if unstable.contains(&slug) { spec.unstable() } else { spec }
    };
    MockPage::new()
        .with_page("/lessons/introduction", video("introduction", "intro01"))
        .with_page("/texts/setup-notes", MockPageSpec::text("<h2>Setup</h2><p>go install</p>"))
        .with_page("/lessons/language-mechanics", video("language-mechanics", "mech02"))
        .with_page("/lessons/data-semantics", video("data-semantics", "data03"))
        .with_page("/texts/reading-memory-gc", MockPageSpec::text("<p>gc</p>"))
}

#[tokio::test(start_paused = true)]
async fn test_full_course_produces_manifest_and_html() {
    let out = tempdir().unwrap();
    let config = AppConfig::default();
    let manifest = load_fixture();
    let paths = storage::prepare_output_dirs(out.path(), &manifest.course.name).unwrap();
    let page = site(&config, &[]);

    let run = CourseScraper::new(&config, paths.course_dir.clone())
        .run(&manifest, &page)
        .await;
    assert!(run.report.failures().is_empty());
    let manifest_path = finish_run(&paths, run).unwrap();

    // 导航顺序与播放器地址
    let slug = "ultimate-go-software-design";
    assert_eq!(
        page.visited(),
        vec![
            format!("{}/{}/lessons/introduction", config.base_url, slug),
            format!("{}/{}/texts/setup-notes", config.base_url, slug),
            format!("{}/{}/lessons/language-mechanics", config.base_url, slug),
            format!("{}/{}/lessons/data-semantics", config.base_url, slug),
            format!("{}/{}/texts/reading-memory-gc", config.base_url, slug),
        ]
    );

    // 课程名中的 ':' 被替换
    assert_eq!(
        manifest_path,
        out.path().join("jsons").join("Ultimate Go_ Software Design.json")
    );
    let written: Value = serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
    assert_eq!(written["name"], "Ultimate Go: Software Design");
    assert_eq!(written["item-count"], 5);
    assert_eq!(written["items"][0]["dynamic-part"], "intro01");
    assert_eq!(written["items"][0]["name"], "0_Introduction");
    assert_eq!(written["items"][0]["downloaded"], false);
    assert_eq!(written["items"][1]["type"], "text");
    assert_eq!(written["items"][1]["downloaded"], true);
    assert!(written["items"][1].get("dynamic-part").is_none());

    let course_dir = out.path().join("Ultimate Go_ Software Design");
    assert_eq!(
        fs::read_to_string(course_dir.join("1_Setup Notes.html")).unwrap(),
        "<h2>Setup</h2><p>go install</p>"
    );
    assert!(course_dir.join("4_Reading_ Memory_GC.html").is_file());
}

#[tokio::test(start_paused = true)]
async fn test_unstable_item_is_omitted_without_renumbering() {
    let out = tempdir().unwrap();
    let config = AppConfig::default();
    let manifest = load_fixture();
    let paths = storage::prepare_output_dirs(out.path(), &manifest.course.name).unwrap();
    let page = site(&config, &["data-semantics"]);

    let run = CourseScraper::new(&config, paths.course_dir.clone())
        .run(&manifest, &page)
        .await;

    let output: &OutputManifest = &run.output;
    let indices: Vec<usize> = output.items.iter().map(|i| i.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 4]);
    assert_eq!(output.item_count, 4);

    let failure = &run.report.failures()[0];
    assert_eq!(failure.index, 3);
    assert_eq!(failure.kind, ContentKind::Video);
    assert_eq!(failure.stage, ItemStage::Stabilize);
}

#[tokio::test(start_paused = true)]
async fn test_failures_at_one_and_three_keep_original_indices() {
    let out = tempdir().unwrap();
    let config = AppConfig::default();
    let manifest = load_fixture();
    let paths = storage::prepare_output_dirs(out.path(), &manifest.course.name).unwrap();
    let page = MockPage::new()
        .with_page("/lessons/introduction", MockPageSpec::video(&config.embed_host, "intro01"))
        // 文字课缺少内容容器
        .with_page("/texts/setup-notes", MockPageSpec::blank())
        .with_page("/lessons/language-mechanics", MockPageSpec::video(&config.embed_host, "mech02"))
        // 视频课 iframe 中没有嵌入脚本
        .with_page("/lessons/data-semantics", MockPageSpec::video_with_frame_scripts(vec![]))
        .with_page("/texts/reading-memory-gc", MockPageSpec::text("<p>gc</p>"));

    let run = CourseScraper::new(&config, paths.course_dir.clone())
        .run(&manifest, &page)
        .await;
    let in_memory = run.output.clone();
    let manifest_path = finish_run(&paths, run).unwrap();

    let written: OutputManifest =
        serde_json::from_str(&fs::read_to_string(manifest_path).unwrap()).unwrap();
    let triples = |output: &OutputManifest| -> Vec<(usize, ContentKind, bool)> {
        output
            .items
            .iter()
            .map(|i| (i.index, i.kind, i.downloaded))
            .collect()
    };
    // 写出的清单与内存中的结果一致
    assert_eq!(triples(&written), triples(&in_memory));
    assert_eq!(written, in_memory);
    assert_eq!(
        triples(&written),
        vec![
            (0, ContentKind::Video, false),
            (2, ContentKind::Video, false),
            (4, ContentKind::Text, true),
        ]
    );
    assert_eq!(written.items[2].name, "4_Reading: Memory/GC");
    assert!(!paths.course_dir.join("1_Setup Notes.html").exists());
}
