//! 清单模块
//!
//! 提供EPUB包中文件清单的结构定义。清单ID和文件路径在插入时即检查唯一性，
//! 重复的条目直接返回错误，而不是依赖调用方碰巧不冲突。

use crate::epub::error::{EpubError, Result};
use crate::epub::xml::XmlElement;
use std::collections::HashMap;

/// 清单项信息
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestItem {
    /// 项目ID
    pub id: String,
    /// 文件路径(相对于OPF文件)
    pub href: String,
    /// 媒体类型
    pub media_type: String,
    /// 属性(如nav、cover-image等)
    pub properties: Option<String>,
}

impl ManifestItem {
    /// 创建新的清单项
    pub fn new(id: impl Into<String>, href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
            properties: None,
        }
    }

    /// 创建带属性的清单项
    pub fn with_properties(
        id: impl Into<String>,
        href: impl Into<String>,
        media_type: impl Into<String>,
        properties: impl Into<String>,
    ) -> Self {
        Self {
            properties: Some(properties.into()),
            ..Self::new(id, href, media_type)
        }
    }

    /// 检查是否为图片文件
    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    /// 检查是否为XHTML文件
    pub fn is_xhtml(&self) -> bool {
        self.media_type == "application/xhtml+xml"
    }
}

/// 有序清单：id → 清单项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Manifest {
    items: Vec<ManifestItem>,
    by_id: HashMap<String, usize>,
    by_href: HashMap<String, usize>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入清单项，ID或路径重复时返回错误
    pub fn insert(&mut self, item: ManifestItem) -> Result<()> {
        if self.by_id.contains_key(&item.id) {
            return Err(EpubError::DuplicateManifestId(item.id));
        }
        if self.by_href.contains_key(&item.href) {
            return Err(EpubError::DuplicateManifestId(format!(
                "{} (路径 {} 已存在)",
                item.id, item.href
            )));
        }

        let index = self.items.len();
        self.by_id.insert(item.id.clone(), index);
        self.by_href.insert(item.href.clone(), index);
        self.items.push(item);
        Ok(())
    }

    /// 按ID查找清单项
    pub fn get(&self, id: &str) -> Option<&ManifestItem> {
        self.by_id.get(id).map(|&index| &self.items[index])
    }

    /// 按路径查找清单项
    pub fn get_by_href(&self, href: &str) -> Option<&ManifestItem> {
        self.by_href.get(href).map(|&index| &self.items[index])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManifestItem> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 转换为 `<manifest>` 元素
    pub fn to_element(&self) -> XmlElement {
        let mut manifest = XmlElement::new("manifest");
        for item in &self.items {
            let mut element = XmlElement::new("item")
                .attr("id", item.id.as_str())
                .attr("href", item.href.as_str())
                .attr("media-type", item.media_type.as_str());
            if let Some(properties) = &item.properties {
                element.set_attribute("properties", properties.as_str());
            }
            manifest = manifest.child(element);
        }
        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_order_and_lookup() {
        let mut manifest = Manifest::new();
        manifest
            .insert(ManifestItem::new("ncx", "toc.ncx", "application/x-dtbncx+xml"))
            .unwrap();
        manifest
            .insert(ManifestItem::new("img1", "images/leaf.png", "image/png"))
            .unwrap();

        let ids: Vec<_> = manifest.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["ncx", "img1"]);
        assert!(manifest.get("img1").unwrap().is_image());
        assert_eq!(manifest.get_by_href("toc.ncx").unwrap().id, "ncx");
    }

    #[test]
    fn test_duplicate_id_is_rejected() {
        let mut manifest = Manifest::new();
        manifest
            .insert(ManifestItem::new("chapter1", "chapter1.xhtml", "application/xhtml+xml"))
            .unwrap();

        let result = manifest.insert(ManifestItem::new("chapter1", "other.xhtml", "application/xhtml+xml"));
        assert!(matches!(result, Err(EpubError::DuplicateManifestId(id)) if id == "chapter1"));
        assert_eq!(manifest.len(), 1);
    }

    #[test]
    fn test_duplicate_href_is_rejected() {
        let mut manifest = Manifest::new();
        manifest
            .insert(ManifestItem::new("a", "images/x.jpg", "image/jpeg"))
            .unwrap();

        let result = manifest.insert(ManifestItem::new("b", "images/x.jpg", "image/jpeg"));
        assert!(result.is_err());
    }

    #[test]
    fn test_nav_properties_serialized() {
        let mut manifest = Manifest::new();
        manifest
            .insert(ManifestItem::with_properties(
                "nav",
                "nav.xhtml",
                "application/xhtml+xml",
                "nav",
            ))
            .unwrap();

        let element = manifest.to_element();
        let item = element.elements().next().unwrap();
        assert_eq!(item.get_attribute("properties"), Some("nav"));
        assert!(manifest.get("nav").unwrap().is_xhtml());
    }
}
