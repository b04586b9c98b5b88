//! HTML源文件处理模块
//!
//! 包括文件名自然排序、标题提取、正文定位与转换，以及正文清理。

pub mod content;
pub mod normalize;
pub mod sort;
pub mod title;

pub use content::{ContentLocator, SourceDocument};
pub use normalize::ContentNormalizer;
pub use sort::{natural_sort, natural_sort_key, NaturalKey};
pub use title::{title_from_filename, FallbackReason, TitleExtractor, TitleOutcome, TitleSource};
