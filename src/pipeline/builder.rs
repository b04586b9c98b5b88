//! 构建流程
//!
//! 按顺序逐章处理源文件（读取、定位正文、清理、下载图片），
//! 然后组装EPUB包，写出暂存目录和最终归档。

use crate::config::{BookConfig, BuildMode};
use crate::epub::archive::{verify_archive, write_archive, write_staging};
use crate::epub::assembler::PackageAssembler;
use crate::epub::chapter::ChapterEntry;
use crate::epub::error::Result;
use crate::epub::opf::Metadata;
use crate::html::{ContentLocator, ContentNormalizer, SourceDocument};
use crate::images::{AssetSet, HttpFetcher, ImageFetcher, ImageResolver};
use crate::pipeline::{ChapterSource, Statistics};
use std::path::PathBuf;

/// 已写入EPUB的章节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSummary {
    pub ordinal: usize,
    pub title: String,
    pub source_filename: String,
}

/// 构建结果
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub mode: BuildMode,
    pub stats: Statistics,
    pub chapters: Vec<ChapterSummary>,
    pub epub_path: PathBuf,
    /// 归档字节数
    pub epub_size: u64,
}

impl BuildReport {
    pub fn epub_size_mb(&self) -> f64 {
        self.epub_size as f64 / (1024.0 * 1024.0)
    }
}

/// EPUB构建器
pub struct BookBuilder<F: ImageFetcher = HttpFetcher> {
    config: BookConfig,
    fetcher: F,
    locator: ContentLocator,
    normalizer: ContentNormalizer,
}

impl BookBuilder<HttpFetcher> {
    /// 使用HTTP下载器创建构建器
    pub fn new(config: BookConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: ImageFetcher> BookBuilder<F> {
    /// 使用指定的图片获取实现创建构建器
    pub fn with_fetcher(config: BookConfig, fetcher: F) -> Result<Self> {
        let locator = ContentLocator::new(&config.source)?;
        let normalizer = ContentNormalizer::new(&config.cleaning);
        Ok(Self {
            config,
            fetcher,
            locator,
            normalizer,
        })
    }

    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    /// 构建EPUB
    ///
    /// 单个章节处理失败只记录错误并跳过；没有任何章节成功、
    /// 打包或写出失败时返回错误。输出路径与书籍目录重叠时不做任何处理。
    pub fn build(&self, sources: &[ChapterSource], mode: BuildMode) -> Result<BuildReport> {
        self.config.check_output_paths()?;
        log::info!("开始构建 ({}模式, {} 个源文件)", mode.label(), sources.len());

        let mut stats = Statistics::new();
        let mut assets = AssetSet::new();
        let mut chapters: Vec<ChapterEntry> = Vec::new();

        for source in sources {
            let ordinal = chapters.len() + 1;
            match self.process_chapter(source, ordinal, &mut assets, &mut stats) {
                Ok(entry) => {
                    log::info!("章节 {}: {} ({})", ordinal, entry.title, entry.source_filename);
                    stats.chapters += 1;
                    chapters.push(entry);
                }
                Err(e) => {
                    log::error!("处理 {} 失败: {}", source.path.display(), e);
                    stats.record_error(format!("处理 {} 失败: {}", source.path.display(), e));
                }
            }
        }

        let metadata = Metadata::from_book_info(&self.config.book);
        let package = PackageAssembler::new(metadata).assemble(&chapters, &assets, mode)?;

        write_staging(&package.files, &self.config.output.staging_dir)?;
        let epub_path = self.config.output.epub_file.clone();
        let epub_size = write_archive(&package.files, &epub_path)?;
        verify_archive(&epub_path)?;

        Ok(BuildReport {
            mode,
            stats,
            chapters: chapters
                .into_iter()
                .map(|entry| ChapterSummary {
                    ordinal: entry.ordinal,
                    title: entry.title,
                    source_filename: entry.source_filename,
                })
                .collect(),
            epub_path,
            epub_size,
        })
    }

    /// 处理单个源文件：读取、定位正文、清理、下载并改写图片
    pub fn process_chapter(
        &self,
        source: &ChapterSource,
        ordinal: usize,
        assets: &mut AssetSet,
        stats: &mut Statistics,
    ) -> Result<ChapterEntry> {
        let document = SourceDocument::read(&source.path)?;
        let mut content = self.locator.extract(&document.parse());

        let removed = self.normalizer.normalize(&mut content);
        log::debug!("{}: 删除了 {} 个非正文元素", source.file_name, removed);

        ImageResolver::new(&self.fetcher, &self.config.source.origin).resolve(&mut content, assets, stats);

        Ok(ChapterEntry {
            ordinal,
            title: source.title().to_string(),
            source_filename: document.file_name(),
            content,
        })
    }
}
