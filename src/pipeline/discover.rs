//! 输入文件发现
//!
//! 自动发现书籍目录中的HTML文件，或按调用方给出的文件模式解析，
//! 并为每个文件提取标题。

use crate::config::SourceConfig;
use crate::epub::error::{EpubError, Result};
use crate::html::{TitleExtractor, TitleOutcome, natural_sort};
use glob::{MatchOptions, Pattern, glob_with};
use std::path::{Path, PathBuf};

/// 一个待处理的章节源文件
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterSource {
    pub path: PathBuf,
    pub file_name: String,
    pub title: TitleOutcome,
}

impl ChapterSource {
    pub fn new(path: PathBuf, title: TitleOutcome) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, file_name, title }
    }

    pub fn title(&self) -> &str {
        self.title.title()
    }
}

/// 列出目录中所有 `.html` 文件，按自然顺序排序
pub fn discover_html_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = expand(&format!("{}/*.html", escaped_dir(dir)))?;
    if files.is_empty() {
        return Err(EpubError::NoInputFiles(dir.display().to_string()));
    }

    natural_sort(&mut files);
    log::info!("在 {} 中发现 {} 个HTML文件", dir.display(), files.len());
    Ok(files)
}

/// 按文件模式解析输入文件
///
/// 相对模式以书籍目录为基准，支持通配符。每个模式的匹配结果按自然顺序排序后
/// 依模式顺序追加；没有匹配的模式只记录警告，全部模式都没有匹配时返回错误。
pub fn resolve_patterns<P: AsRef<Path>>(dir: P, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let mut files = Vec::new();

    for pattern in patterns {
        let full_pattern = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            format!("{}/{}", escaped_dir(dir), pattern)
        };

        let mut matches = expand(&full_pattern)?;
        if matches.is_empty() {
            log::warn!("没有文件匹配: {}", pattern);
            continue;
        }
        natural_sort(&mut matches);
        log::debug!("模式 {} 匹配 {} 个文件", pattern, matches.len());
        files.extend(matches);
    }

    if files.is_empty() {
        return Err(EpubError::NoInputFiles(patterns.join(" ")));
    }
    Ok(files)
}

/// 为每个文件提取标题
pub fn with_titles(files: Vec<PathBuf>, extractor: &TitleExtractor) -> Vec<ChapterSource> {
    files
        .into_iter()
        .map(|path| {
            let title = extractor.extract_from_file(&path);
            if let TitleOutcome::Fallback { title, reason } = &title {
                log::warn!("{} 使用文件名作为标题 \"{}\": {:?}", path.display(), title, reason);
            }
            ChapterSource::new(path, title)
        })
        .collect()
}

/// 解析输入文件并提取标题：没有给出模式时自动发现
pub fn discover_chapters(config: &SourceConfig, patterns: &[String]) -> Result<Vec<ChapterSource>> {
    let extractor = TitleExtractor::new(&config.title_suffix_pattern)?;
    let files = if patterns.is_empty() {
        discover_html_files(&config.book_dir)?
    } else {
        resolve_patterns(&config.book_dir, patterns)?
    };
    Ok(with_titles(files, &extractor))
}

fn escaped_dir(dir: &Path) -> String {
    Pattern::escape(&dir.to_string_lossy())
}

/// 通配符不匹配以 `.` 开头的文件名
fn expand(pattern: &str) -> Result<Vec<PathBuf>> {
    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };
    let entries = glob_with(pattern, options)
        .map_err(|e| EpubError::InvalidPattern(format!("{}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => log::warn!("无法读取匹配项: {}", e),
        }
    }
    Ok(files)
}
