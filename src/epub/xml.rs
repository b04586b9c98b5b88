//! 结构化XML文档模块
//!
//! 所有输出文件（OPF、NCX、XHTML章节、导航文档、container.xml）都先构建为元素树，
//! 再统一经由本模块的写入器序列化，文本与属性的转义全部交给quick-xml处理。

use crate::epub::error::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;
use std::io::Write;

/// XHTML命名空间
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
/// EPUB操作命名空间（epub:type）
pub const OPS_NS: &str = "http://www.idpf.org/2007/ops";

/// HTML空元素，XHTML输出时只有它们使用自闭合形式
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// 元素树中的节点
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// XML元素：名称、有序属性和子节点
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// 创建空元素
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// 追加属性（构建器风格）
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// 追加子元素（构建器风格）
    pub fn child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    /// 追加文本（构建器风格）
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(XmlNode::Text(text.into()));
        self
    }

    /// 追加子节点
    pub fn push(&mut self, node: XmlNode) {
        self.children.push(node);
    }

    /// 读取属性值
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 设置属性值，已存在时覆盖
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// 检查class属性中是否包含指定类名
    pub fn has_class(&self, class: &str) -> bool {
        self.get_attribute("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// 直接子元素迭代器
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// 按文档顺序收集所有指定名称的后代元素（不含自身）
    pub fn descendants_named(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElement>) {
        for element in self.elements() {
            if element.name == name {
                found.push(element);
            }
            element.collect_named(name, found);
        }
    }

    /// 按文档顺序对每个后代元素执行可变操作（先序遍历，不含自身）
    pub fn for_each_descendant_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut XmlElement),
    {
        for node in &mut self.children {
            if let XmlNode::Element(element) = node {
                f(element);
                element.for_each_descendant_mut(f);
            }
        }
    }

    /// 拼接所有后代文本
    pub fn text_content(&self) -> String {
        let mut result = String::new();
        self.collect_text(&mut result);
        result
    }

    fn collect_text(&self, result: &mut String) {
        for node in &self.children {
            match node {
                XmlNode::Text(text) => result.push_str(text),
                XmlNode::Element(element) => element.collect_text(result),
            }
        }
    }
}

/// 输出风格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlStyle {
    /// 包文件（OPF、NCX、container.xml）：缩进，空元素自闭合
    Package,
    /// XHTML内容文档：不缩进（避免改变混排内容），只有空元素自闭合
    Xhtml,
}

/// 带XML声明和可选DOCTYPE的完整文档
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub doctype: Option<String>,
    pub root: XmlElement,
}

impl XmlDocument {
    /// 创建不带DOCTYPE的文档
    pub fn new(root: XmlElement) -> Self {
        Self { doctype: None, root }
    }

    /// 创建HTML5 DOCTYPE的XHTML文档
    pub fn xhtml(root: XmlElement) -> Self {
        Self {
            doctype: Some("html".to_string()),
            root,
        }
    }

    /// 序列化为UTF-8字符串
    pub fn to_xml_string(&self, style: XmlStyle) -> Result<String> {
        let bytes = self.to_bytes(style)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// 序列化为字节
    pub fn to_bytes(&self, style: XmlStyle) -> Result<Vec<u8>> {
        let indent = style == XmlStyle::Package;
        let mut writer = if indent {
            Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            Writer::new(Vec::new())
        };

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        if !indent {
            writer.get_mut().write_all(b"\n")?;
        }
        if let Some(doctype) = &self.doctype {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
            if !indent {
                writer.get_mut().write_all(b"\n")?;
            }
        }

        write_element(&mut writer, &self.root, style)?;
        writer.get_mut().write_all(b"\n")?;
        Ok(writer.into_inner())
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement, style: XmlStyle) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &element.attributes {
        let value = sanitize_text(value);
        start.push_attribute((name.as_str(), &*value));
    }

    let self_closing = match style {
        XmlStyle::Package => element.children.is_empty(),
        XmlStyle::Xhtml => VOID_ELEMENTS.contains(&element.name.as_str()),
    };
    if self_closing {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for node in &element.children {
        match node {
            XmlNode::Element(child) => write_element(writer, child, style)?,
            XmlNode::Text(text) => {
                let text = sanitize_text(text);
                writer.write_event(Event::Text(BytesText::new(&text)))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;
    Ok(())
}

/// 去除XML 1.0中不允许出现的控制字符
pub fn sanitize_text(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|c| is_xml_char(*c)).collect())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
}

/// 内容文档根元素上声明过的命名空间前缀
const DECLARED_PREFIXES: [&str; 2] = ["xml", "epub"];

/// 检查字符串能否作为不带前缀的XML名称
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// 检查属性名：不带前缀，或前缀为 `xml`/`epub`
pub fn is_xml_attribute_name(name: &str) -> bool {
    match name.split_once(':') {
        Some((prefix, local)) => DECLARED_PREFIXES.contains(&prefix) && is_xml_name(local),
        None => is_xml_name(name),
    }
}
