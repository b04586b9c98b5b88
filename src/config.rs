//! 书籍配置模块
//!
//! 提供组装EPUB所需的全部可调参数，支持从YAML文件加载。
//! 每个配置段都有默认值，配置文件只需写出要覆盖的字段。

use crate::epub::error::{EpubError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "book.yaml";

/// 生成模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// 每个章节一个内容文档
    #[default]
    MultiPage,
    /// 所有章节合并为一个内容文档
    SinglePage,
}

impl BuildMode {
    pub fn from_single_page(single_page: bool) -> Self {
        if single_page {
            BuildMode::SinglePage
        } else {
            BuildMode::MultiPage
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BuildMode::MultiPage => "multi-page",
            BuildMode::SinglePage => "single-page",
        }
    }
}

/// 书籍元数据配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookInfo {
    /// 书名
    pub title: String,
    /// 作者列表
    pub creators: Vec<String>,
    /// 语言
    pub language: String,
    /// 出版社
    pub publisher: String,
    /// 版权信息
    pub rights: String,
}

impl Default for BookInfo {
    fn default() -> Self {
        Self {
            title: "Botany Chapter 1: Introduction to Botany".to_string(),
            creators: vec![
                "Melissa Ha".to_string(),
                "Maria Morrow".to_string(),
                "Kammy Algiers".to_string(),
            ],
            language: "en".to_string(),
            publisher: "ASCCC Open Educational Resources Initiative".to_string(),
            rights: "CC BY-NC 4.0".to_string(),
        }
    }
}

/// 源HTML配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// HTML章节所在目录
    pub book_dir: PathBuf,
    /// 上游站点地址，用于补全以 `/` 开头的图片路径
    pub origin: String,
    /// 正文容器选择器
    pub content_selector: String,
    /// 找不到正文容器时的备选选择器
    pub fallback_selector: String,
    /// 从 `<title>` 中去除站点后缀的正则表达式
    pub title_suffix_pattern: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            book_dir: PathBuf::from("book"),
            origin: "https://bio.libretexts.org".to_string(),
            content_selector: "section.mt-content-container".to_string(),
            fallback_selector: "section".to_string(),
            title_suffix_pattern: r"\s*[-|]\s*(LibreTexts|Botany).*$".to_string(),
        }
    }
}

/// 正文清理配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// 无条件删除的标签
    pub removed_tags: Vec<String>,
    /// 按类名删除的导航/署名标签
    pub chrome_tags: Vec<String>,
    /// 导航/署名元素的类名
    pub chrome_classes: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            removed_tags: to_strings(&[
                "script",
                "style",
                "footer",
                "mjx-container",
                "mjx-assistive-mml",
                "mjx-speech",
            ]),
            chrome_tags: to_strings(&["nav", "div"]),
            chrome_classes: to_strings(&[
                "mt-guide-listings",
                "mt-topic-hierarchy-listings",
                "autoattribution",
                "mt-content-footer",
            ]),
        }
    }
}

/// 图片下载配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// 单次请求超时（秒）
    pub timeout_secs: u64,
    /// 请求使用的User-Agent
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36"
                .to_string(),
        }
    }
}

/// 输出配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 暂存目录，结构与最终压缩包一致
    pub staging_dir: PathBuf,
    /// 最终EPUB文件路径
    pub epub_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            staging_dir: PathBuf::from("epub-output"),
            epub_file: PathBuf::from("botany-chapter1.epub"),
        }
    }
}

/// 汇总报告配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// 汇总中最多列出的错误条数
    pub max_errors: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { max_errors: 10 }
    }
}

/// 完整的书籍配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    pub book: BookInfo,
    pub source: SourceConfig,
    pub cleaning: CleaningConfig,
    pub fetch: FetchConfig,
    pub output: OutputConfig,
    pub report: ReportConfig,
}

impl BookConfig {
    /// 从YAML配置文件加载
    ///
    /// # 参数
    /// * `path` - 配置文件路径
    ///
    /// # 返回值
    /// * `Result<Self>` - 加载成功返回配置实例，失败返回错误
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| EpubError::ConfigError(format!("无法读取配置文件: {}", e)))?;

        Self::from_yaml(&content)
    }

    /// 从YAML字符串解析
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yml::from_str(content)
            .map_err(|e| EpubError::ConfigError(format!("配置文件格式错误: {}", e)))
    }

    /// 配置文件存在时加载，不存在时使用默认配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            log::info!("加载配置文件: {}", path.display());
            Self::from_file(path)
        } else {
            log::info!("配置文件 {} 不存在，使用默认配置", path.display());
            Ok(Self::default_config())
        }
    }

    /// 生成默认配置文件
    ///
    /// # 参数
    /// * `path` - 输出路径
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let yaml_content = serde_yml::to_string(&Self::default_config())
            .map_err(|e| EpubError::ConfigError(format!("序列化配置失败: {}", e)))?;

        let content_with_header = format!(
            "# 书籍配置文件\n# 定义EPUB元数据、HTML来源、清理规则、图片下载和输出路径\n# 省略的字段使用默认值\n\n{}",
            yaml_content
        );

        fs::write(path.as_ref(), content_with_header)
            .map_err(|e| EpubError::ConfigError(format!("写入配置文件失败: {}", e)))?;

        Ok(())
    }

    /// 获取默认配置
    pub fn default_config() -> Self {
        Self::default()
    }

    /// 检查输出路径不会覆盖输入
    ///
    /// 暂存目录等于或包含书籍目录、或包含EPUB输出文件时返回 `ConfigError`。
    pub fn check_output_paths(&self) -> Result<()> {
        let staging = resolve_path(&self.output.staging_dir)?;

        if resolve_path(&self.source.book_dir)?.starts_with(&staging) {
            return Err(EpubError::ConfigError(format!(
                "暂存目录 {} 不能是或包含书籍目录 {}",
                self.output.staging_dir.display(),
                self.source.book_dir.display()
            )));
        }
        if resolve_path(&self.output.epub_file)?.starts_with(&staging) {
            return Err(EpubError::ConfigError(format!(
                "暂存目录 {} 不能包含EPUB输出文件 {}",
                self.output.staging_dir.display(),
                self.output.epub_file.display()
            )));
        }
        Ok(())
    }
}

/// 转为绝对路径，去掉 `.` 和 `..`，已存在的前缀部分解析符号链接
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let mut normal = PathBuf::new();
    for component in std::path::absolute(path)?.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other),
        }
    }

    let mut existing = normal.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(canonical) = fs::canonicalize(existing) {
            return Ok(rest.iter().rev().fold(canonical, |path, part| path.join(part)));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => return Ok(normal),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
book:
  title: "Plant Anatomy"
fetch:
  timeout_secs: 5
"#;
        let config = BookConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.book.title, "Plant Anatomy");
        assert_eq!(config.book.language, "en");
        assert_eq!(config.fetch.timeout_secs, 5);
        assert!(config.fetch.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.source.origin, "https://bio.libretexts.org");
        assert_eq!(config.report.max_errors, 10);
    }

    #[test]
    fn test_generate_then_load_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.yaml");

        BookConfig::generate_default_config(&path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("# 书籍配置文件"));

        let loaded = BookConfig::from_file(&path).unwrap();
        assert_eq!(loaded, BookConfig::default_config());
    }

    #[test]
    fn test_missing_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let config = BookConfig::load_or_default(dir.path().join("missing.yaml")).unwrap();
        assert_eq!(config, BookConfig::default_config());
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let result = BookConfig::from_yaml("book: [unclosed");
        assert!(matches!(result, Err(EpubError::ConfigError(_))));
    }

    #[test]
    fn test_staging_dir_must_not_contain_book_dir() {
        let dir = tempdir().unwrap();
        let mut config = BookConfig::default_config();
        config.output.staging_dir = dir.path().join("work");
        config.source.book_dir = dir.path().join("work").join("book");
        config.output.epub_file = dir.path().join("out.epub");
        assert!(matches!(config.check_output_paths(), Err(EpubError::ConfigError(_))));

        config.output.staging_dir = dir.path().join("work").join("book").join("..");
        assert!(matches!(config.check_output_paths(), Err(EpubError::ConfigError(_))));

        config.output.staging_dir = config.source.book_dir.clone();
        assert!(matches!(config.check_output_paths(), Err(EpubError::ConfigError(_))));
    }

    #[test]
    fn test_staging_dir_must_not_contain_epub_file() {
        let dir = tempdir().unwrap();
        let mut config = BookConfig::default_config();
        config.source.book_dir = dir.path().join("book");
        config.output.staging_dir = dir.path().join("epub-output");
        config.output.epub_file = dir.path().join("epub-output").join("book.epub");
        assert!(matches!(config.check_output_paths(), Err(EpubError::ConfigError(_))));
    }

    #[test]
    fn test_sibling_output_paths_are_accepted() {
        let dir = tempdir().unwrap();
        let mut config = BookConfig::default_config();
        config.source.book_dir = dir.path().join("book");
        config.output.staging_dir = dir.path().join("book-output");
        config.output.epub_file = dir.path().join("book.epub");
        assert!(config.check_output_paths().is_ok());
    }

    #[test]
    fn test_build_mode_from_flag() {
        assert_eq!(BuildMode::from_single_page(true), BuildMode::SinglePage);
        assert_eq!(BuildMode::from_single_page(false).label(), "multi-page");
    }
}
