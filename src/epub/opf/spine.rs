//! 脊柱模块
//!
//! 提供EPUB包中阅读顺序（脊柱）的结构定义。

use crate::epub::xml::XmlElement;

/// 脊柱项信息(阅读顺序)
#[derive(Debug, Clone, PartialEq)]
pub struct SpineItem {
    /// 引用的清单项ID
    pub idref: String,
    /// 是否线性阅读
    pub linear: bool,
}

impl SpineItem {
    /// 创建新的脊柱项
    pub fn new(idref: impl Into<String>) -> Self {
        Self {
            idref: idref.into(),
            linear: true,
        }
    }
}

/// 脊柱：按阅读顺序排列的清单项引用
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Spine {
    /// NCX清单项ID
    pub toc: Option<String>,
    items: Vec<SpineItem>,
}

impl Spine {
    /// 创建引用指定NCX的脊柱
    pub fn with_toc(toc: impl Into<String>) -> Self {
        Self {
            toc: Some(toc.into()),
            items: Vec::new(),
        }
    }

    /// 按顺序追加脊柱项
    pub fn push(&mut self, item: SpineItem) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[SpineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 转换为 `<spine>` 元素
    pub fn to_element(&self) -> XmlElement {
        let mut spine = XmlElement::new("spine");
        if let Some(toc) = &self.toc {
            spine.set_attribute("toc", toc.as_str());
        }
        for item in &self.items {
            let mut itemref = XmlElement::new("itemref").attr("idref", item.idref.as_str());
            if !item.linear {
                itemref.set_attribute("linear", "no");
            }
            spine = spine.child(itemref);
        }
        spine
    }
}
