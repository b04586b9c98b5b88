//! 图片资源集合
//!
//! 以本地文件名为键去重。文件名只由(URL, alt文本)决定，
//! 因此不同章节引用同一图片时只保留一份；alt文本相同的不同图片也会落到同一文件名，
//! 这种冲突按后写覆盖处理，并通过 [`AssetInsert::Collision`] 报告给调用方。

use std::collections::BTreeMap;

/// 已下载的图片
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAsset {
    /// 本地文件名（不含 `images/` 前缀）
    pub filename: String,
    /// 图片字节
    pub bytes: Vec<u8>,
    /// 由扩展名推断的媒体类型
    pub media_type: &'static str,
}

/// 插入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetInsert {
    /// 新文件名
    Added,
    /// 文件名已存在且内容相同
    Duplicate,
    /// 文件名已存在但内容不同，新内容覆盖旧内容
    Collision,
}

/// 文件名 → 图片资源，按文件名有序
#[derive(Debug, Clone, Default)]
pub struct AssetSet {
    assets: BTreeMap<String, ImageAsset>,
}

impl AssetSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入资源
    pub fn insert(&mut self, asset: ImageAsset) -> AssetInsert {
        match self.assets.get(&asset.filename) {
            None => {
                self.assets.insert(asset.filename.clone(), asset);
                AssetInsert::Added
            }
            Some(existing) if existing.bytes == asset.bytes => AssetInsert::Duplicate,
            Some(_) => {
                self.assets.insert(asset.filename.clone(), asset);
                AssetInsert::Collision
            }
        }
    }

    pub fn get(&self, filename: &str) -> Option<&ImageAsset> {
        self.assets.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.assets.contains_key(filename)
    }

    /// 按文件名顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = &ImageAsset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
