//! 图片处理模块
//!
//! 找出正文中的图片引用，规范化URL，生成稳定的本地文件名，下载并改写引用。

pub mod fetch;
pub mod resolver;
pub mod store;

pub use fetch::{HttpFetcher, ImageFetcher};
pub use resolver::{derive_filename, media_type_for, normalize_image_url, ImageReference, ImageResolver};
pub use store::{AssetInsert, AssetSet, ImageAsset};
