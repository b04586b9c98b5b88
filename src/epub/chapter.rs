//! 章节文档渲染
//!
//! 分页模式下每章一个XHTML文档，单页模式下所有章节合并为一个文档，
//! 每章对应一个带锚点的 `<section>`。

use crate::epub::xml::{OPS_NS, XHTML_NS, XmlDocument, XmlElement};
use std::collections::HashSet;

/// 样式表在OEBPS中的文件名
pub const STYLESHEET_HREF: &str = "styles.css";
/// 单页模式下合并文档的文件名
pub const COMBINED_HREF: &str = "content.xhtml";

/// 固定样式表
pub const STYLESHEET: &str = r#"body {
    font-family: Georgia, serif;
    line-height: 1.6;
    margin: 1em;
    color: #333;
}

h1 {
    color: #2c5f2d;
    font-size: 1.8em;
    margin-top: 0;
}

h2 {
    color: #2c5f2d;
    font-size: 1.5em;
    margin-top: 1.5em;
}

h3 {
    color: #2c5f2d;
    font-size: 1.3em;
}

p {
    margin: 1em 0;
    text-align: justify;
}

img {
    max-width: 100%;
    height: auto;
    display: block;
    margin: 1em auto;
}

figure {
    margin: 1.5em 0;
    text-align: center;
}

figcaption {
    font-style: italic;
    font-size: 0.9em;
    margin-top: 0.5em;
    color: #666;
}

strong, b {
    font-weight: bold;
}

em, i {
    font-style: italic;
}

ul, ol {
    margin: 1em 0;
    padding-left: 2em;
}

li {
    margin: 0.5em 0;
}

.box-objectives {
    background-color: #f0f7f0;
    border-left: 4px solid #2c5f2d;
    padding: 1em;
    margin: 1.5em 0;
}

.box-note {
    background-color: #f9f9f9;
    border: 1px solid #ddd;
    padding: 1em;
    margin: 1.5em 0;
}
"#;

/// 一个成功处理的章节
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterEntry {
    /// 序号（从1开始，清单、脊柱、导航共用）
    pub ordinal: usize,
    /// 显示标题
    pub title: String,
    /// 源文件名
    pub source_filename: String,
    /// 清理并改写过图片引用的正文
    pub content: XmlElement,
}

impl ChapterEntry {
    /// 分页模式下的文档文件名
    pub fn href(&self) -> String {
        format!("chapter{}.xhtml", self.ordinal)
    }

    /// 清单id
    pub fn manifest_id(&self) -> String {
        format!("chapter{}", self.ordinal)
    }
}

/// 合并后的单页文档及各章节锚点（与章节顺序一致）
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedDocument {
    pub document: XmlDocument,
    pub anchors: Vec<String>,
}

/// 由标题生成锚点：小写化，空格和句点替换为 `-`
pub fn section_anchor(title: &str) -> String {
    title.to_lowercase().replace(' ', "-").replace('.', "-")
}

/// 锚点分配器，重复的锚点依次追加 `-2`、`-3`
#[derive(Debug, Default)]
pub struct AnchorSet {
    used: HashSet<String>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, title: &str) -> String {
        let base = section_anchor(title);
        let mut anchor = base.clone();
        let mut suffix = 2;
        while self.used.contains(&anchor) {
            anchor = format!("{}-{}", base, suffix);
            suffix += 1;
        }
        self.used.insert(anchor.clone());
        anchor
    }
}

/// 渲染单个章节文档
pub fn render_chapter(entry: &ChapterEntry) -> XmlDocument {
    let section = XmlElement::new("section")
        .child(XmlElement::new("h1").text(entry.title.as_str()))
        .child(entry.content.clone());
    XmlDocument::xhtml(page(&entry.title, vec![section]))
}

/// 把所有章节渲染为一个文档
pub fn render_combined(book_title: &str, entries: &[ChapterEntry]) -> CombinedDocument {
    let mut allocator = AnchorSet::new();
    let mut anchors = Vec::with_capacity(entries.len());
    let mut sections = Vec::with_capacity(entries.len());

    for entry in entries {
        let anchor = allocator.allocate(&entry.title);
        sections.push(
            XmlElement::new("section")
                .attr("id", anchor.as_str())
                .child(XmlElement::new("h1").text(entry.title.as_str()))
                .child(entry.content.clone()),
        );
        anchors.push(anchor);
    }

    CombinedDocument {
        document: XmlDocument::xhtml(page(book_title, sections)),
        anchors,
    }
}

fn page(title: &str, sections: Vec<XmlElement>) -> XmlElement {
    let head = XmlElement::new("head")
        .child(XmlElement::new("title").text(title))
        .child(
            XmlElement::new("link")
                .attr("rel", "stylesheet")
                .attr("type", "text/css")
                .attr("href", STYLESHEET_HREF),
        );

    let mut body = XmlElement::new("body");
    for section in sections {
        body = body.child(section);
    }

    XmlElement::new("html")
        .attr("xmlns", XHTML_NS)
        .attr("xmlns:epub", OPS_NS)
        .child(head)
        .child(body)
}
