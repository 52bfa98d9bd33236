// src/scraper/storage.rs

use crate::{
    constants,
    error::{AppError, AppResult},
    models::{CourseManifest, OutputManifest},
    utils,
};
use log::{debug, info};
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// 一次运行的输出位置
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub jsons_dir: PathBuf,
    pub course_dir: PathBuf,
}

pub fn load_manifest(path: &Path) -> AppResult<CourseManifest> {
    let content = fs::read_to_string(path).map_err(|source| AppError::ManifestRead {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest: CourseManifest =
        serde_json::from_str(&content).map_err(|source| AppError::ManifestParse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "已加载课程清单 '{}'，共 {} 个课程项",
        manifest.course.name,
        manifest.contents.len()
    );
    Ok(manifest)
}

fn create_dir(path: PathBuf) -> AppResult<PathBuf> {
    fs::create_dir_all(&path).map_err(|source| AppError::CreateDir {
        path: path.clone(),
        source,
    })?;
    debug!("目录已就绪: {}", path.display());
    Ok(path)
}

/// 创建 `{output}/jsons` 与 `{output}/{课程名}` 两个目录
pub fn prepare_output_dirs(output_dir: &Path, course_name: &str) -> AppResult<OutputPaths> {
    let jsons_dir = create_dir(output_dir.join(constants::JSONS_DIR))?;
    let course_dir = create_dir(output_dir.join(utils::sanitize_filename(course_name)))?;
    Ok(OutputPaths {
        jsons_dir,
        course_dir,
    })
}

/// 保存文字课 HTML：`{course_dir}/{index}_{name}.html`
pub fn save_html(course_dir: &Path, index: usize, name: &str, html: &str) -> io::Result<PathBuf> {
    let filename = format!("{}_{}.html", index, utils::sanitize_filename(name));
    let path = course_dir.join(filename);
    fs::write(&path, html)?;
    Ok(path)
}

/// 以 2 空格缩进写出结果清单，返回文件路径
pub fn save_output_manifest(jsons_dir: &Path, output: &OutputManifest) -> AppResult<PathBuf> {
    let path = jsons_dir.join(format!("{}.json", utils::sanitize_filename(&output.name)));
    let mut json = serde_json::to_string_pretty(output)?;
    json.push('\n');
    fs::write(&path, json)?;
    info!("结果清单已写入 {} ({} 项)", path.display(), output.item_count);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExtractionResult;
    use tempfile::tempdir;

    #[test]
    fn test_prepare_output_dirs_sanitizes_course_name() {
        let dir = tempdir().unwrap();
        let paths = prepare_output_dirs(dir.path(), "Ultimate Go: Service").unwrap();
        assert!(paths.jsons_dir.is_dir());
        assert_eq!(paths.course_dir, dir.path().join("Ultimate Go_ Service"));
        assert!(paths.course_dir.is_dir());
    }

    #[test]
    fn test_save_html_writes_markup_verbatim() {
        let dir = tempdir().unwrap();
        let path = save_html(dir.path(), 4, "Reading: Maps/Sets", "<p>raw</p>").unwrap();
        assert_eq!(path, dir.path().join("4_Reading_ Maps_Sets.html"));
        assert_eq!(fs::read_to_string(path).unwrap(), "<p>raw</p>");
    }

    #[test]
    fn test_manifest_is_two_space_indented() {
        let dir = tempdir().unwrap();
        let output = OutputManifest::new("Go", vec![ExtractionResult::text(0, "a")]);
        let path = save_output_manifest(dir.path(), &output).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("{\n  \"name\": \"Go\",\n  \"item-count\": 1,"));
        assert_eq!(serde_json::from_str::<OutputManifest>(&written).unwrap(), output);
    }

    #[test]
    fn test_load_manifest_errors_are_fatal_kinds() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(load_manifest(&missing), Err(AppError::ManifestRead { .. })));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ \"course\": ").unwrap();
        assert!(matches!(load_manifest(&broken), Err(AppError::ManifestParse { .. })));
    }
}
