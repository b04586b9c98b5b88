//! NCX文件与EPUB 3导航文档生成

use crate::epub::error::Result;
use crate::epub::ncx::NavMap;
use crate::epub::xml::{OPS_NS, XHTML_NS, XmlDocument, XmlElement, XmlStyle};

const NCX_NS: &str = "http://www.daisy.org/z3986/2005/ncx/";

/// NCX文件
#[derive(Debug, Clone, PartialEq)]
pub struct Ncx {
    /// 唯一标识符（与OPF的dc:identifier一致）
    pub uid: String,
    /// 文档标题
    pub doc_title: String,
    /// 导航地图
    pub nav_map: NavMap,
}

impl Ncx {
    /// 创建NCX
    pub fn new(uid: impl Into<String>, doc_title: impl Into<String>, nav_map: NavMap) -> Self {
        Self {
            uid: uid.into(),
            doc_title: doc_title.into(),
            nav_map,
        }
    }

    /// 生成toc.ncx内容
    pub fn to_xml(&self) -> Result<String> {
        let head = XmlElement::new("head")
            .child(meta("dtb:uid", &self.uid))
            .child(meta("dtb:depth", "1"))
            .child(meta("dtb:totalPageCount", "0"))
            .child(meta("dtb:maxPageNumber", "0"));

        let mut nav_map = XmlElement::new("navMap");
        for point in &self.nav_map.nav_points {
            nav_map = nav_map.child(
                XmlElement::new("navPoint")
                    .attr("id", point.id.as_str())
                    .attr("playOrder", point.play_order.to_string())
                    .child(XmlElement::new("navLabel").child(XmlElement::new("text").text(point.label.as_str())))
                    .child(XmlElement::new("content").attr("src", point.src.as_str())),
            );
        }

        let root = XmlElement::new("ncx")
            .attr("xmlns", NCX_NS)
            .attr("version", "2005-1")
            .child(head)
            .child(XmlElement::new("docTitle").child(XmlElement::new("text").text(self.doc_title.as_str())))
            .child(nav_map);
        XmlDocument::new(root).to_xml_string(XmlStyle::Package)
    }

    /// 生成EPUB 3导航文档（nav.xhtml），条目与NCX一一对应
    pub fn to_nav_xhtml(&self, stylesheet: &str) -> Result<String> {
        let mut list = XmlElement::new("ol");
        for point in &self.nav_map.nav_points {
            list = list.child(
                XmlElement::new("li").child(
                    XmlElement::new("a")
                        .attr("href", point.src.as_str())
                        .text(point.label.as_str()),
                ),
            );
        }

        let root = XmlElement::new("html")
            .attr("xmlns", XHTML_NS)
            .attr("xmlns:epub", OPS_NS)
            .child(
                XmlElement::new("head")
                    .child(XmlElement::new("title").text(self.doc_title.as_str()))
                    .child(
                        XmlElement::new("link")
                            .attr("rel", "stylesheet")
                            .attr("type", "text/css")
                            .attr("href", stylesheet),
                    ),
            )
            .child(
                XmlElement::new("body").child(
                    XmlElement::new("nav")
                        .attr("epub:type", "toc")
                        .attr("id", "toc")
                        .child(XmlElement::new("h1").text(self.doc_title.as_str()))
                        .child(list),
                ),
            );
        XmlDocument::xhtml(root).to_xml_string(XmlStyle::Xhtml)
    }
}

fn meta(name: &str, content: &str) -> XmlElement {
    XmlElement::new("meta").attr("name", name).attr("content", content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ncx() -> Ncx {
        let mut nav_map = NavMap::new();
        nav_map.push("navPoint1", "Introduction", "chapter1.xhtml");
        nav_map.push("navPoint2", "Cells & Tissues", "chapter2.xhtml");
        Ncx::new("urn:uuid:1234", "Botany Chapter 1", nav_map)
    }

    #[test]
    fn test_ncx_xml() {
        let xml = sample_ncx().to_xml().unwrap();

        assert!(xml.contains("<meta name=\"dtb:uid\" content=\"urn:uuid:1234\"/>"));
        assert!(xml.contains("<meta name=\"dtb:depth\" content=\"1\"/>"));
        assert!(xml.contains("<navPoint id=\"navPoint2\" playOrder=\"2\">"));
        assert!(xml.contains("<text>Cells &amp; Tissues</text>"));
        assert!(xml.contains("<content src=\"chapter1.xhtml\"/>"));
    }

    #[test]
    fn test_nav_xhtml_mirrors_nav_map() {
        let xhtml = sample_ncx().to_nav_xhtml("styles.css").unwrap();

        assert!(xhtml.contains("<nav epub:type=\"toc\" id=\"toc\">"));
        assert!(xhtml.contains("<a href=\"chapter1.xhtml\">Introduction</a>"));
        assert!(xhtml.contains("<a href=\"chapter2.xhtml\">Cells &amp; Tissues</a>"));
    }
}
