//! 图片引用解析与改写

use crate::epub::xml::XmlElement;
use crate::images::{AssetInsert, AssetSet, ImageAsset, ImageFetcher};
use crate::pipeline::Statistics;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^a-z0-9]+").expect("文件名正则有效"));

/// alt文本生成的文件名最大长度
const MAX_SLUG_LEN: usize = 50;
/// URL哈希生成的文件名长度
const HASH_PREFIX_LEN: usize = 16;

/// 正文中的一个图片引用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// `src` 属性原值
    pub original_src: String,
    /// 规范化后的绝对URL
    pub url: String,
    /// alt文本
    pub alt: String,
    /// 推导出的本地文件名
    pub filename: String,
}

impl ImageReference {
    /// 从 `<img>` 元素构造引用，`src` 为空时返回None
    pub fn from_element(element: &XmlElement, origin: &str) -> Option<Self> {
        let src = element.get_attribute("src")?;
        if src.is_empty() {
            return None;
        }
        let alt = element.get_attribute("alt").unwrap_or_default().to_string();
        let url = normalize_image_url(src, origin);
        let filename = derive_filename(&url, &alt);
        Some(Self {
            original_src: src.to_string(),
            url,
            alt,
            filename,
        })
    }

    /// 改写后的相对路径
    pub fn local_path(&self) -> String {
        format!("images/{}", self.filename)
    }
}

/// 把协议相对、站点相对的图片地址补全为绝对URL，其余保持原样
pub fn normalize_image_url(src: &str, origin: &str) -> String {
    if src.starts_with("http") {
        src.to_string()
    } else if let Some(rest) = src.strip_prefix("//") {
        format!("https://{}", rest)
    } else if src.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), src)
    } else {
        src.to_string()
    }
}

/// 由(URL, alt文本)推导本地文件名
///
/// alt非空时：小写化，非字母数字串替换为单个 `-`，截断到50个字符（空白也算非字母数字）；
/// alt为空时：URL的MD5十六进制前16位。扩展名取自URL路径，区分大小写地匹配
/// jpg/jpeg/png/gif/svg，否则为 `.jpg`。
/// 这是纯函数，同一输入总得到同一文件名；alt相同的不同图片会得到相同文件名。
pub fn derive_filename(url: &str, alt: &str) -> String {
    let extension = url_extension(url);

    let base: String = if alt.is_empty() {
        let digest = format!("{:x}", md5::compute(url.as_bytes()));
        digest[..HASH_PREFIX_LEN].to_string()
    } else {
        NON_ALPHANUMERIC
            .replace_all(&alt.to_lowercase(), "-")
            .chars()
            .take(MAX_SLUG_LEN)
            .collect()
    };

    format!("{}{}", base, extension)
}

/// 按扩展名推断图片媒体类型，未知扩展名视为JPEG
pub fn media_type_for(filename: &str) -> &'static str {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
}

fn url_extension(url: &str) -> &'static str {
    let path = url_path(url);
    let name = path.rsplit('/').next().unwrap_or(path);
    let extension = Path::new(name).extension().and_then(|ext| ext.to_str());

    match extension {
        Some("jpeg") => ".jpeg",
        Some("png") => ".png",
        Some("gif") => ".gif",
        Some("svg") => ".svg",
        _ => ".jpg",
    }
}

/// URL中的路径部分（不含查询串和片段）
fn url_path(url: &str) -> &str {
    let without_query = url.split(['?', '#']).next().unwrap_or(url);
    match without_query.find("://") {
        Some(index) => {
            let after_scheme = &without_query[index + 3..];
            after_scheme.find('/').map(|slash| &after_scheme[slash..]).unwrap_or("")
        }
        None => without_query,
    }
}

/// 图片解析器：逐个下载正文中的图片并改写引用
pub struct ImageResolver<'a, F: ImageFetcher + ?Sized> {
    fetcher: &'a F,
    origin: &'a str,
}

impl<'a, F: ImageFetcher + ?Sized> ImageResolver<'a, F> {
    pub fn new(fetcher: &'a F, origin: &'a str) -> Self {
        Self { fetcher, origin }
    }

    /// 按文档顺序列出正文中所有 `src` 非空的图片引用
    pub fn references(&self, root: &XmlElement) -> Vec<ImageReference> {
        root.descendants_named("img")
            .into_iter()
            .filter_map(|img| ImageReference::from_element(img, self.origin))
            .collect()
    }

    /// 按文档顺序逐个下载图片
    ///
    /// 成功时把字节放入资源集合并把 `src` 改写为 `images/<文件名>`；
    /// 失败时保留原始 `src`，记录错误并计数，不影响本章节其余内容。
    pub fn resolve(&self, root: &mut XmlElement, assets: &mut AssetSet, stats: &mut Statistics) {
        root.for_each_descendant_mut(&mut |element| {
            if element.name != "img" {
                return;
            }
            let Some(reference) = ImageReference::from_element(element, self.origin) else {
                return;
            };
            stats.images_found += 1;

            match self.fetcher.fetch(&reference.url) {
                Ok(bytes) => {
                    stats.images_downloaded += 1;
                    log::debug!("下载图片: {} -> {}", reference.url, reference.filename);

                    let asset = ImageAsset {
                        filename: reference.filename.clone(),
                        media_type: media_type_for(&reference.filename),
                        bytes,
                    };
                    if assets.insert(asset) == AssetInsert::Collision {
                        stats.image_collisions += 1;
                        log::warn!(
                            "图片文件名冲突，{} 覆盖了同名的不同图片 ({})",
                            reference.filename,
                            reference.url
                        );
                    }
                    element.set_attribute("src", reference.local_path());
                }
                Err(e) => {
                    stats.images_failed += 1;
                    log::warn!("图片下载失败 {}: {}", reference.url, e);
                    stats.record_error(format!("下载图片失败 {}: {}", reference.url, e));
                }
            }
        });
    }
}
