//! OPF包文件生成模块

use crate::epub::error::{EpubError, Result};
use crate::epub::opf::{Manifest, Metadata, Spine};
use crate::epub::xml::{XmlDocument, XmlElement, XmlStyle};

const OPF_NS: &str = "http://www.idpf.org/2007/opf";

/// OPF包文件
#[derive(Debug, Clone, PartialEq)]
pub struct Opf {
    /// EPUB版本
    pub version: String,
    /// 元数据
    pub metadata: Metadata,
    /// 清单项(文件列表)
    pub manifest: Manifest,
    /// 脊柱(阅读顺序)
    pub spine: Spine,
}

impl Opf {
    /// 创建EPUB 3.0包文件
    pub fn new(metadata: Metadata, manifest: Manifest, spine: Spine) -> Self {
        Self {
            version: "3.0".to_string(),
            metadata,
            manifest,
            spine,
        }
    }

    /// 检查脊柱和NCX引用的清单项都存在
    pub fn check_references(&self) -> Result<()> {
        if let Some(toc) = &self.spine.toc {
            if self.manifest.get(toc).is_none() {
                return Err(EpubError::MissingManifestItem(toc.clone()));
            }
        }
        for item in self.spine.items() {
            if self.manifest.get(&item.idref).is_none() {
                return Err(EpubError::MissingManifestItem(item.idref.clone()));
            }
        }
        Ok(())
    }

    /// 生成content.opf内容
    pub fn to_xml(&self) -> Result<String> {
        let root = XmlElement::new("package")
            .attr("xmlns", OPF_NS)
            .attr("version", self.version.as_str())
            .attr("unique-identifier", "book-id")
            .child(self.metadata.to_element())
            .child(self.manifest.to_element())
            .child(self.spine.to_element());
        XmlDocument::new(root).to_xml_string(XmlStyle::Package)
    }
}
