pub mod archive;
pub mod assembler;
pub mod chapter;
pub mod container;
pub mod error;
pub mod ncx;
pub mod opf;
pub mod xml;

// 重新导出错误处理
pub use error::{EpubError, Result};

// 重新导出容器相关
pub use container::{Container, RootFile};

// 重新导出归档与组装
pub use archive::{PackageFile, verify_archive, write_archive, write_staging};
pub use assembler::{EpubPackage, PackageAssembler};
pub use chapter::{AnchorSet, ChapterEntry, CombinedDocument, render_chapter, render_combined, section_anchor};

// 重新导出OPF相关
pub use opf::{Manifest, ManifestItem, Metadata, Opf, Spine, SpineItem};

// 重新导出NCX相关
pub use ncx::{NavMap, NavPoint, Ncx};

// 重新导出XML文档树
pub use xml::{XmlDocument, XmlElement, XmlNode, XmlStyle};
