//! NCX（Navigation Control file for XML）导航模块
//!
//! 此模块生成EPUB的目录结构：EPUB 2的 `toc.ncx` 以及EPUB 3的 `nav.xhtml` 导航文档，
//! 两者由同一份导航地图生成，条目一一对应。

pub mod document;
pub mod navigation;

pub use document::Ncx;
pub use navigation::{NavMap, NavPoint};
