//! 正文定位与转换
//!
//! 在解析后的HTML中找到正文容器，并把它转换为可写出为XHTML的元素树。

use crate::config::SourceConfig;
use crate::epub::error::{EpubError, Result};
use crate::epub::xml::{XmlElement, XmlNode, is_xml_attribute_name, is_xml_name};
use once_cell::sync::Lazy;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::{Path, PathBuf};

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("body选择器有效"));

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// 一个源HTML文件
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub html: String,
}

impl SourceDocument {
    /// 读取HTML文件，非UTF-8字节按替换字符处理
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            html: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// 文件名部分
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }
}

/// 正文容器定位器
#[derive(Debug, Clone)]
pub struct ContentLocator {
    primary: Selector,
    fallback: Selector,
}

impl ContentLocator {
    /// 根据配置中的选择器创建定位器
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            primary: parse_selector(&config.content_selector)?,
            fallback: parse_selector(&config.fallback_selector)?,
        })
    }

    /// 选出正文容器并转换为元素树
    ///
    /// 依次尝试正文选择器、备选选择器；都找不到时取 `<body>` 的内容，
    /// 并把外层改名为 `div` 以便嵌入章节的 `<section>`。
    pub fn extract(&self, document: &Html) -> XmlElement {
        if let Some(root) = document
            .select(&self.primary)
            .next()
            .or_else(|| document.select(&self.fallback).next())
        {
            return element_to_xml(root);
        }

        let body = document
            .select(&BODY_SELECTOR)
            .next()
            .unwrap_or_else(|| document.root_element());
        let mut content = element_to_xml(body);
        content.name = "div".to_string();
        content.attributes.clear();
        content
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| EpubError::ConfigError(format!("无效的CSS选择器 {}: {:?}", selector, e)))
}

/// 把scraper元素递归转换为元素树
///
/// 注释、处理指令被丢弃；名称不合法的元素只保留其子节点，名称不合法的属性直接丢弃。
pub fn element_to_xml(element: ElementRef) -> XmlElement {
    let value = element.value();
    let mut xml = XmlElement::new(value.name());

    for (name, attr_value) in value.attrs() {
        if name != "xmlns" && is_xml_attribute_name(name) {
            xml.attributes.push((name.to_string(), attr_value.to_string()));
        }
    }
    match value.name() {
        "svg" => xml.set_attribute("xmlns", SVG_NS),
        "math" => xml.set_attribute("xmlns", MATHML_NS),
        _ => {}
    }

    append_children(element, &mut xml);
    xml
}

fn append_children(element: ElementRef, xml: &mut XmlElement) {
    for node in element.children() {
        match node.value() {
            Node::Text(text) => {
                let text: &str = text;
                match xml.children.last_mut() {
                    Some(XmlNode::Text(previous)) => previous.push_str(text),
                    _ => xml.push(XmlNode::Text(text.to_string())),
                }
            }
            Node::Element(child) => {
                if let Some(child_element) = ElementRef::wrap(node) {
                    if is_xml_name(child.name()) {
                        xml.push(XmlNode::Element(element_to_xml(child_element)));
                    } else {
                        append_children(child_element, xml);
                    }
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locator() -> ContentLocator {
        ContentLocator::new(&SourceConfig::default()).unwrap()
    }

    #[test]
    fn test_prefers_main_content_section() {
        let html = Html::parse_document(
            r#"<body><section id="other"><p>nav</p></section>
<section class="mt-content-container"><p>Body text</p></section></body>"#,
        );
        let content = locator().extract(&html);

        assert_eq!(content.name, "section");
        assert!(content.has_class("mt-content-container"));
        assert_eq!(content.text_content(), "Body text");
    }

    #[test]
    fn test_falls_back_to_first_section() {
        let html = Html::parse_document("<body><section id=\"a\"><p>A</p></section><section><p>B</p></section></body>");
        let content = locator().extract(&html);

        assert_eq!(content.get_attribute("id"), Some("a"));
    }

    #[test]
    fn test_falls_back_to_body_as_div() {
        let html = Html::parse_document("<html><head><title>T</title></head><body class=\"x\"><p>Only body</p></body></html>");
        let content = locator().extract(&html);

        assert_eq!(content.name, "div");
        assert!(content.attributes.is_empty());
        assert_eq!(content.text_content(), "Only body");
    }

    #[test]
    fn test_conversion_keeps_attributes_and_drops_comments() {
        let html = Html::parse_document(
            r#"<section><!-- note --><img src="/a.png" alt="Leaf"><p @click="x" class="c">t</p></section>"#,
        );
        let content = locator().extract(&html);

        let img = content.descendants_named("img")[0];
        assert_eq!(img.get_attribute("src"), Some("/a.png"));
        assert_eq!(img.get_attribute("alt"), Some("Leaf"));

        let p = content.descendants_named("p")[0];
        assert_eq!(p.attributes, vec![("class".to_string(), "c".to_string())]);
        assert!(content.children.iter().all(|node| !matches!(node, XmlNode::Text(t) if t.contains("note"))));
    }

    #[test]
    fn test_prefixed_office_markup_is_unwrapped() {
        let html = Html::parse_document(
            r#"<section><p v:shape="s1" xml:lang="en">Word<o:p>text</o:p></p></section>"#,
        );
        let content = locator().extract(&html);

        assert!(content.descendants_named("o:p").is_empty());
        let p = content.descendants_named("p")[0];
        assert_eq!(p.children, vec![XmlNode::Text("Wordtext".to_string())]);
        assert_eq!(p.attributes, vec![("xml:lang".to_string(), "en".to_string())]);
    }

    #[test]
    fn test_inline_svg_gets_namespace() {
        let html = Html::parse_document("<section><svg viewBox=\"0 0 1 1\"><circle r=\"1\"></circle></svg></section>");
        let content = locator().extract(&html);

        let svg = content.descendants_named("svg")[0];
        assert_eq!(svg.get_attribute("xmlns"), Some(SVG_NS));
    }

    #[test]
    fn test_invalid_selector_is_config_error() {
        let config = SourceConfig {
            content_selector: "section[".to_string(),
            ..SourceConfig::default()
        };
        assert!(matches!(ContentLocator::new(&config), Err(EpubError::ConfigError(_))));
    }
}
