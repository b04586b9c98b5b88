//! 章节标题提取
//!
//! 标题优先级：`<title>`（去掉站点后缀）→ 第一个 `<h1>` → 由文件名生成。
//! 提取永远不会失败，但是否走了兜底路径会体现在 [`TitleOutcome`] 中。

use crate::epub::error::{EpubError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::fs;
use std::path::Path;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("title选择器有效"));
static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").expect("h1选择器有效"));

/// 标题来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// `<title>` 元素
    TitleElement,
    /// 第一个 `<h1>`
    Heading,
}

/// 使用文件名兜底的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// 文档中没有可用的 `<title>` 或 `<h1>`
    NoTitleOrHeading,
    /// 文件无法读取
    Unreadable(String),
}

/// 标题提取结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleOutcome {
    Extracted { title: String, source: TitleSource },
    Fallback { title: String, reason: FallbackReason },
}

impl TitleOutcome {
    /// 最终使用的标题
    pub fn title(&self) -> &str {
        match self {
            TitleOutcome::Extracted { title, .. } | TitleOutcome::Fallback { title, .. } => title,
        }
    }

    pub fn into_title(self) -> String {
        match self {
            TitleOutcome::Extracted { title, .. } | TitleOutcome::Fallback { title, .. } => title,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TitleOutcome::Fallback { .. })
    }
}

/// 标题提取器
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    suffix: Regex,
}

impl TitleExtractor {
    /// 使用站点后缀正则创建提取器
    ///
    /// # 参数
    /// * `suffix_pattern` - 匹配需要从 `<title>` 末尾去掉的站点名称
    pub fn new(suffix_pattern: &str) -> Result<Self> {
        let suffix = Regex::new(suffix_pattern)
            .map_err(|e| EpubError::ConfigError(format!("无效的标题后缀正则 {}: {}", suffix_pattern, e)))?;
        Ok(Self { suffix })
    }

    /// 读取并解析文件后提取标题，读取失败时使用文件名
    pub fn extract_from_file(&self, path: &Path) -> TitleOutcome {
        match fs::read(path) {
            Ok(bytes) => {
                let html = String::from_utf8_lossy(&bytes);
                let document = Html::parse_document(&html);
                self.extract(&document, path)
            }
            Err(e) => TitleOutcome::Fallback {
                title: title_from_filename(path),
                reason: FallbackReason::Unreadable(e.to_string()),
            },
        }
    }

    /// 从已解析的文档提取标题
    pub fn extract(&self, document: &Html, path: &Path) -> TitleOutcome {
        if let Some(title) = document.select(&TITLE_SELECTOR).next() {
            let text = title.text().collect::<String>();
            let stripped = self.suffix.replace(text.trim(), "");
            let stripped = stripped.trim();
            if !stripped.is_empty() {
                return TitleOutcome::Extracted {
                    title: stripped.to_string(),
                    source: TitleSource::TitleElement,
                };
            }
        }

        if let Some(h1) = document.select(&H1_SELECTOR).next() {
            let text = h1.text().collect::<String>();
            let text = text.trim();
            if !text.is_empty() {
                return TitleOutcome::Extracted {
                    title: text.to_string(),
                    source: TitleSource::Heading,
                };
            }
        }

        TitleOutcome::Fallback {
            title: title_from_filename(path),
            reason: FallbackReason::NoTitleOrHeading,
        }
    }
}

/// 由文件名生成标题：去掉扩展名，`-`/`_` 换成空格，每个单词首字母大写
pub fn title_from_filename(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    stem.replace(['-', '_'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
