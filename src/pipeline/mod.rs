//! 构建流水线
//!
//! 输入文件发现、逐章处理、统计汇总和最终打包。

pub mod builder;
pub mod discover;
pub mod stats;

pub use builder::{BookBuilder, BuildReport, ChapterSummary};
pub use discover::{ChapterSource, discover_chapters, discover_html_files, resolve_patterns, with_titles};
pub use stats::Statistics;
