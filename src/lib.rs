pub mod config;
pub mod epub;
pub mod html;
pub mod images;
pub mod pipeline;

// === 核心API重新导出 ===

/// 构建器（主要接口）
pub use pipeline::{BookBuilder, BuildReport, ChapterSummary};

/// 错误处理
pub use epub::{EpubError, Result};

/// 配置
pub use config::{BookConfig, BookInfo, BuildMode};

// === 输入与统计 ===

/// 输入文件发现
pub use pipeline::{ChapterSource, discover_chapters, discover_html_files, resolve_patterns};

/// 构建统计
pub use pipeline::Statistics;

// === 底层组件（高级用法） ===

/// HTML处理组件
pub use html::{
    ContentLocator,
    ContentNormalizer,
    SourceDocument,
    TitleExtractor,
    TitleOutcome,
    natural_sort,
    natural_sort_key,
};

/// 图片组件
pub use images::{AssetSet, HttpFetcher, ImageAsset, ImageFetcher, ImageResolver, derive_filename};

/// EPUB组件
pub use epub::{
    ChapterEntry,
    Container,
    EpubPackage,
    Manifest,
    ManifestItem,
    Metadata,
    NavMap,
    NavPoint,
    Ncx,
    Opf,
    PackageAssembler,
    Spine,
    SpineItem,
    verify_archive,
};

// === 库信息 ===

/// BookPress库的版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// BookPress库的描述
pub const DESCRIPTION: &str = "一个将HTML章节目录组装为EPUB电子书的Rust库";

// === 便捷函数 ===

/// 按配置自动发现章节并构建EPUB
///
/// 这是 `discover_chapters` + `BookBuilder::build` 的便捷包装函数，
/// 图片通过HTTP下载。
///
/// # 参数
/// * `config` - 书籍配置
/// * `mode` - 分页或单页模式
///
/// # 示例
///
/// ```no_run
/// use bookpress::{BookConfig, BuildMode};
///
/// let report = bookpress::build(BookConfig::default_config(), BuildMode::MultiPage)?;
/// println!("章节数: {}", report.stats.chapters);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn build(config: BookConfig, mode: BuildMode) -> Result<BuildReport> {
    let sources = discover_chapters(&config.source, &[])?;
    BookBuilder::new(config)?.build(&sources, mode)
}
