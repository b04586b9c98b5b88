//! 正文清理
//!
//! 从正文元素树中删除脚本、样式、页脚、MathJax渲染产物以及站点导航/署名块。
//! 这是针对固定上游页面结构的过滤器，不是通用的HTML净化器。

use crate::config::CleaningConfig;
use crate::epub::xml::{XmlElement, XmlNode};

/// 正文清理器
#[derive(Debug, Clone)]
pub struct ContentNormalizer {
    removed_tags: Vec<String>,
    chrome_tags: Vec<String>,
    chrome_classes: Vec<String>,
}

impl ContentNormalizer {
    pub fn new(config: &CleaningConfig) -> Self {
        Self {
            removed_tags: config.removed_tags.clone(),
            chrome_tags: config.chrome_tags.clone(),
            chrome_classes: config.chrome_classes.clone(),
        }
    }

    /// 原地清理根元素的所有后代（根元素自身不会被删除），返回删除的元素数
    ///
    /// 删除后的结果中不再有任何匹配元素，所以对输出再次调用是无操作。
    pub fn normalize(&self, root: &mut XmlElement) -> usize {
        let mut removed = 0;
        root.children.retain(|node| match node {
            XmlNode::Element(element) if self.is_boilerplate(element) => {
                removed += 1;
                false
            }
            _ => true,
        });

        for node in &mut root.children {
            if let XmlNode::Element(element) = node {
                removed += self.normalize(element);
            }
        }
        removed
    }

    /// 判断元素是否属于需要删除的非正文内容
    pub fn is_boilerplate(&self, element: &XmlElement) -> bool {
        if self.removed_tags.iter().any(|tag| *tag == element.name) {
            return true;
        }
        self.chrome_tags.iter().any(|tag| *tag == element.name)
            && self.chrome_classes.iter().any(|class| element.has_class(class))
    }
}

impl Default for ContentNormalizer {
    fn default() -> Self {
        Self::new(&CleaningConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceConfig;
    use crate::html::ContentLocator;
    use scraper::Html;

    fn content(html: &str) -> XmlElement {
        let locator = ContentLocator::new(&SourceConfig::default()).unwrap();
        locator.extract(&Html::parse_document(html))
    }

    const PAGE: &str = r#"<html><head><style>p{}</style></head><body>
<section class="mt-content-container">
  <script>track()</script>
  <p>Plants <mjx-container class="MathJax"><mjx-assistive-mml>x</mjx-assistive-mml></mjx-container>grow.</p>
  <div class="mt-guide-listings"><a href="/next">Next</a></div>
  <nav class="autoattribution">By someone</nav>
  <div class="box-note"><p>Keep me</p></div>
  <div class="mt-content-footer wide">footer chrome</div>
  <footer>site footer</footer>
  <style>.x{}</style>
  <mjx-speech>speech</mjx-speech>
</section></body></html>"#;

    #[test]
    fn test_removes_boilerplate() {
        let mut root = content(PAGE);
        let removed = ContentNormalizer::default().normalize(&mut root);

        assert_eq!(removed, 8);
        let text = root.text_content();
        assert!(text.contains("Plants"));
        assert!(text.contains("grow."));
        assert!(text.contains("Keep me"));
        for gone in ["track()", "Next", "By someone", "footer chrome", "site footer", "speech"] {
            assert!(!text.contains(gone), "{gone}");
        }
        assert!(root.descendants_named("mjx-container").is_empty());
        assert!(root.descendants_named("script").is_empty());
        assert!(root.descendants_named("footer").is_empty());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = ContentNormalizer::default();
        let mut root = content(PAGE);
        normalizer.normalize(&mut root);
        let once = root.clone();

        assert_eq!(normalizer.normalize(&mut root), 0);
        assert_eq!(root, once);
    }

    #[test]
    fn test_class_rule_only_applies_to_chrome_tags() {
        let mut root = content(r#"<section><p class="autoattribution">kept</p></section>"#);
        assert_eq!(ContentNormalizer::default().normalize(&mut root), 0);
        assert_eq!(root.text_content(), "kept");
    }

    #[test]
    fn test_root_itself_is_never_removed() {
        let mut root = XmlElement::new("footer").text("root footer");
        assert_eq!(ContentNormalizer::default().normalize(&mut root), 0);
        assert_eq!(root.text_content(), "root footer");
    }
}
