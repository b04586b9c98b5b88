//! OPF（Open Packaging Format）包文件模块
//!
//! 此模块负责生成EPUB包文件：元数据、清单、脊柱，以及把它们序列化为 `content.opf`。

mod manifest;
mod metadata;
mod package;
mod spine;

pub use manifest::{Manifest, ManifestItem};
pub use metadata::Metadata;
pub use package::Opf;
pub use spine::{Spine, SpineItem};
