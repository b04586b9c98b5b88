//! NCX导航元素数据结构定义
//!
//! 定义导航点和导航地图。

/// 导航点
#[derive(Debug, Clone, PartialEq)]
pub struct NavPoint {
    /// 唯一标识符
    pub id: String,
    /// 播放顺序（从1开始）
    pub play_order: u32,
    /// 导航标签文本
    pub label: String,
    /// 内容引用（相对于OPF目录，可带 `#锚点`）
    pub src: String,
}

impl NavPoint {
    /// 创建新的导航点
    pub fn new(id: impl Into<String>, play_order: u32, label: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            play_order,
            label: label.into(),
            src: src.into(),
        }
    }

    /// 内容引用中的文件部分
    pub fn target_file(&self) -> &str {
        self.src.split('#').next().unwrap_or(&self.src)
    }

    /// 内容引用中的锚点部分
    pub fn target_anchor(&self) -> Option<&str> {
        self.src.split_once('#').map(|(_, anchor)| anchor)
    }
}

/// 导航地图
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavMap {
    /// 导航点列表
    pub nav_points: Vec<NavPoint>,
}

impl NavMap {
    /// 创建新的导航地图
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加导航点，playOrder按追加顺序自动编号
    pub fn push(&mut self, id: impl Into<String>, label: impl Into<String>, src: impl Into<String>) {
        let play_order = self.nav_points.len() as u32 + 1;
        self.nav_points.push(NavPoint::new(id, play_order, label, src));
    }

    pub fn len(&self) -> usize {
        self.nav_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nav_points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_order_follows_insertion() {
        let mut nav_map = NavMap::new();
        nav_map.push("navPoint1", "Introduction", "chapter1.xhtml");
        nav_map.push("navPoint2", "Cells", "chapter2.xhtml");

        let orders: Vec<_> = nav_map.nav_points.iter().map(|p| p.play_order).collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[test]
    fn test_target_split() {
        let point = NavPoint::new("navPoint1", 1, "Cells", "content.xhtml#cells");
        assert_eq!(point.target_file(), "content.xhtml");
        assert_eq!(point.target_anchor(), Some("cells"));

        let point = NavPoint::new("navPoint2", 2, "Intro", "chapter1.xhtml");
        assert_eq!(point.target_file(), "chapter1.xhtml");
        assert_eq!(point.target_anchor(), None);
    }
}
