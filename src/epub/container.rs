use crate::epub::error::{EpubError, Result};
use crate::epub::xml::{XmlDocument, XmlElement, XmlStyle};
use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// OPF包文件的媒体类型
pub const OPF_MEDIA_TYPE: &str = "application/oebps-package+xml";

const CONTAINER_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:container";

/// Container.xml中的rootfile信息
#[derive(Debug, Clone, PartialEq)]
pub struct RootFile {
    pub full_path: String,
    pub media_type: String,
}

/// META-INF/container.xml 描述
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub rootfiles: Vec<RootFile>,
}

impl Container {
    /// 创建只指向一个OPF文件的container
    ///
    /// # 参数
    /// * `opf_path` - OPF文件在压缩包中的完整路径，如 `OEBPS/content.opf`
    pub fn for_opf(opf_path: &str) -> Self {
        Self {
            rootfiles: vec![RootFile {
                full_path: opf_path.to_string(),
                media_type: OPF_MEDIA_TYPE.to_string(),
            }],
        }
    }

    /// 生成container.xml内容
    pub fn to_xml(&self) -> Result<String> {
        let mut rootfiles = XmlElement::new("rootfiles");
        for rootfile in &self.rootfiles {
            rootfiles = rootfiles.child(
                XmlElement::new("rootfile")
                    .attr("full-path", rootfile.full_path.as_str())
                    .attr("media-type", rootfile.media_type.as_str()),
            );
        }

        let root = XmlElement::new("container")
            .attr("version", "1.0")
            .attr("xmlns", CONTAINER_NS)
            .child(rootfiles);
        XmlDocument::new(root).to_xml_string(XmlStyle::Package)
    }

    /// 解析container.xml内容
    ///
    /// # 参数
    /// * `xml_content` - container.xml的文件内容
    ///
    /// # 返回值
    /// * `Result<Container, EpubError>` - 解析后的Container信息
    pub fn parse_xml(xml_content: &str) -> Result<Container> {
        let mut reader = Reader::from_str(xml_content);
        reader.config_mut().trim_text(true);
        reader.config_mut().expand_empty_elements = true;

        let mut rootfiles = Vec::new();
        let mut buf = Vec::new();
        let mut in_rootfiles = false;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"rootfiles" => {
                        in_rootfiles = true;
                    }
                    b"rootfile" if in_rootfiles => {
                        let mut full_path = String::new();
                        let mut media_type = String::new();

                        for attr_result in e.attributes() {
                            let attr = attr_result
                                .map_err(|e| EpubError::XmlError(quick_xml::Error::InvalidAttr(e)))?;
                            match attr.key.local_name().as_ref() {
                                b"full-path" => {
                                    full_path = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                b"media-type" => {
                                    media_type = String::from_utf8_lossy(&attr.value).to_string();
                                }
                                _ => {}
                            }
                        }

                        if !full_path.is_empty() && !media_type.is_empty() {
                            rootfiles.push(RootFile {
                                full_path,
                                media_type,
                            });
                        }
                    }
                    _ => {}
                },
                Event::End(ref e) => {
                    if e.local_name().as_ref() == b"rootfiles" {
                        in_rootfiles = false;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if rootfiles.is_empty() {
            return Err(EpubError::ContainerParseError(
                "没有找到任何rootfile条目".to_string(),
            ));
        }

        Ok(Container { rootfiles })
    }

    /// 获取主要的OPF文件路径
    pub fn get_opf_path(&self) -> Option<String> {
        self.rootfiles
            .iter()
            .find(|rootfile| rootfile.media_type == OPF_MEDIA_TYPE)
            .or_else(|| self.rootfiles.first())
            .map(|rootfile| rootfile.full_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_xml_round_trip() {
        let container = Container::for_opf("OEBPS/content.opf");
        let xml = container.to_xml().unwrap();

        assert!(xml.contains("urn:oasis:names:tc:opendocument:xmlns:container"));
        assert!(xml.contains("full-path=\"OEBPS/content.opf\""));

        let parsed = Container::parse_xml(&xml).unwrap();
        assert_eq!(parsed, container);
        assert_eq!(parsed.get_opf_path(), Some("OEBPS/content.opf".to_string()));
    }

    #[test]
    fn test_parse_container_xml_prefers_opf_rootfile() {
        let container_xml = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/toc.ncx" media-type="application/x-dtbncx+xml"/>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

        let container = Container::parse_xml(container_xml).unwrap();
        assert_eq!(container.rootfiles.len(), 2);
        assert_eq!(container.get_opf_path(), Some("OEBPS/content.opf".to_string()));
    }

    #[test]
    fn test_parse_container_without_rootfile() {
        let container_xml = r#"<container version="1.0"><rootfiles></rootfiles></container>"#;

        let result = Container::parse_xml(container_xml);
        assert!(matches!(result, Err(EpubError::ContainerParseError(_))));
    }
}
