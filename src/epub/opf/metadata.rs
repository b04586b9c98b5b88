//! 元数据处理模块
//!
//! 提供EPUB包元数据（Dublin Core + dcterms:modified）的结构定义和生成功能。

use crate::config::BookInfo;
use crate::epub::xml::XmlElement;
use chrono::{DateTime, Utc};
use uuid::Uuid;

const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// OPF文件中的元数据信息
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
    /// 唯一标识符（urn:uuid:...），同时用作NCX的dtb:uid
    pub identifier: String,
    /// 书名
    pub title: String,
    /// 作者列表
    pub creators: Vec<String>,
    /// 语言
    pub language: String,
    /// 出版社
    pub publisher: Option<String>,
    /// 版权信息
    pub rights: Option<String>,
    /// 出版日期(YYYY-MM-DD)
    pub date: String,
    /// 最后修改时间(UTC)
    pub modified: String,
}

impl Metadata {
    /// 根据书籍配置生成元数据，每次调用都会生成新的标识符
    pub fn from_book_info(info: &BookInfo) -> Self {
        Self::from_book_info_at(info, Utc::now())
    }

    /// 使用指定时间生成元数据
    pub fn from_book_info_at(info: &BookInfo, now: DateTime<Utc>) -> Self {
        Self {
            identifier: format!("urn:uuid:{}", Uuid::new_v4()),
            title: info.title.clone(),
            creators: info.creators.clone(),
            language: info.language.clone(),
            publisher: non_empty(&info.publisher),
            rights: non_empty(&info.rights),
            date: now.format("%Y-%m-%d").to_string(),
            modified: now.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        }
    }

    /// 转换为 `<metadata>` 元素
    pub fn to_element(&self) -> XmlElement {
        let mut metadata = XmlElement::new("metadata")
            .attr("xmlns:dc", DC_NS)
            .child(
                XmlElement::new("dc:identifier")
                    .attr("id", "book-id")
                    .text(self.identifier.as_str()),
            )
            .child(XmlElement::new("dc:title").text(self.title.as_str()));

        for creator in &self.creators {
            metadata = metadata.child(XmlElement::new("dc:creator").text(creator.as_str()));
        }

        metadata = metadata
            .child(XmlElement::new("dc:language").text(self.language.as_str()))
            .child(XmlElement::new("dc:date").text(self.date.as_str()));

        if let Some(publisher) = &self.publisher {
            metadata = metadata.child(XmlElement::new("dc:publisher").text(publisher.as_str()));
        }
        if let Some(rights) = &self.rights {
            metadata = metadata.child(XmlElement::new("dc:rights").text(rights.as_str()));
        }

        metadata.child(
            XmlElement::new("meta")
                .attr("property", "dcterms:modified")
                .text(self.modified.as_str()),
        )
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_info() -> BookInfo {
        BookInfo {
            title: "Botany & Friends".to_string(),
            creators: vec!["Melissa Ha".to_string(), "Maria Morrow".to_string()],
            language: "en".to_string(),
            publisher: "ASCCC OERI".to_string(),
            rights: String::new(),
        }
    }

    #[test]
    fn test_from_book_info_formats_dates() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        let metadata = Metadata::from_book_info_at(&sample_info(), now);

        assert!(metadata.identifier.starts_with("urn:uuid:"));
        assert_eq!(metadata.date, "2024-03-09");
        assert_eq!(metadata.modified, "2024-03-09T07:05:01Z");
        assert_eq!(metadata.publisher, Some("ASCCC OERI".to_string()));
        assert_eq!(metadata.rights, None);
    }

    #[test]
    fn test_identifier_is_fresh_per_build() {
        let a = Metadata::from_book_info(&sample_info());
        let b = Metadata::from_book_info(&sample_info());
        assert_ne!(a.identifier, b.identifier);
    }

    #[test]
    fn test_to_element_lists_every_creator() {
        let metadata = Metadata::from_book_info(&sample_info());
        let element = metadata.to_element();

        let creators: Vec<_> = element
            .elements()
            .filter(|e| e.name == "dc:creator")
            .map(|e| e.text_content())
            .collect();
        assert_eq!(creators, vec!["Melissa Ha", "Maria Morrow"]);
        assert!(element.elements().all(|e| e.name != "dc:rights"));
    }
}
