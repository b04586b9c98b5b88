//! EPUB包组装
//!
//! 由章节列表、图片资源集合和生成模式构建清单、脊柱、导航和container，
//! 并给出归档中除mimetype外的全部文件。

use crate::config::BuildMode;
use crate::epub::archive::{CONTAINER_PATH, PackageFile};
use crate::epub::chapter::{
    COMBINED_HREF, ChapterEntry, STYLESHEET, STYLESHEET_HREF, render_chapter, render_combined,
};
use crate::epub::container::Container;
use crate::epub::error::{EpubError, Result};
use crate::epub::ncx::{NavMap, Ncx};
use crate::epub::opf::{Manifest, ManifestItem, Metadata, Opf, Spine, SpineItem};
use crate::epub::xml::{XmlDocument, XmlStyle};
use crate::images::AssetSet;
use std::collections::HashSet;

/// OPF等包文件所在目录
pub const CONTENT_DIR: &str = "OEBPS";
/// OPF文件名
pub const OPF_HREF: &str = "content.opf";
/// NCX文件名
pub const NCX_HREF: &str = "toc.ncx";
/// EPUB 3导航文档文件名
pub const NAV_HREF: &str = "nav.xhtml";

const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";
const NCX_MEDIA_TYPE: &str = "application/x-dtbncx+xml";
const CSS_MEDIA_TYPE: &str = "text/css";

/// 组装完成的EPUB包
#[derive(Debug, Clone)]
pub struct EpubPackage {
    pub opf: Opf,
    pub ncx: Ncx,
    /// 按写入顺序排列的归档文件（不含mimetype）
    pub files: Vec<PackageFile>,
}

impl EpubPackage {
    /// 按归档路径查找文件
    pub fn file(&self, path: &str) -> Option<&PackageFile> {
        self.files.iter().find(|file| file.path == path)
    }
}

/// 内容文档：清单id、文件名和文档树
struct ContentDocument {
    id: String,
    href: String,
    document: XmlDocument,
}

/// EPUB包组装器
#[derive(Debug, Clone)]
pub struct PackageAssembler {
    metadata: Metadata,
}

impl PackageAssembler {
    pub fn new(metadata: Metadata) -> Self {
        Self { metadata }
    }

    /// 组装EPUB包
    ///
    /// 章节按序号顺序进入脊柱和导航；没有任何章节时返回 [`EpubError::NoChapters`]。
    pub fn assemble(&self, chapters: &[ChapterEntry], assets: &AssetSet, mode: BuildMode) -> Result<EpubPackage> {
        if chapters.is_empty() {
            return Err(EpubError::NoChapters);
        }

        let mut documents = Vec::new();
        let mut nav_map = NavMap::new();
        let mut anchors = HashSet::new();

        match mode {
            BuildMode::MultiPage => {
                for (index, chapter) in chapters.iter().enumerate() {
                    let href = chapter.href();
                    nav_map.push(format!("navPoint{}", index + 1), chapter.title.as_str(), href.as_str());
                    documents.push(ContentDocument {
                        id: chapter.manifest_id(),
                        href,
                        document: render_chapter(chapter),
                    });
                }
            }
            BuildMode::SinglePage => {
                let combined = render_combined(&self.metadata.title, chapters);
                for (index, (chapter, anchor)) in chapters.iter().zip(&combined.anchors).enumerate() {
                    nav_map.push(
                        format!("navPoint{}", index + 1),
                        chapter.title.as_str(),
                        format!("{}#{}", COMBINED_HREF, anchor),
                    );
                    anchors.insert(anchor.clone());
                }
                documents.push(ContentDocument {
                    id: "content".to_string(),
                    href: COMBINED_HREF.to_string(),
                    document: combined.document,
                });
            }
        }

        let mut manifest = Manifest::new();
        manifest.insert(ManifestItem::new("ncx", NCX_HREF, NCX_MEDIA_TYPE))?;
        manifest.insert(ManifestItem::with_properties("nav", NAV_HREF, XHTML_MEDIA_TYPE, "nav"))?;
        manifest.insert(ManifestItem::new("css", STYLESHEET_HREF, CSS_MEDIA_TYPE))?;

        let mut spine = Spine::with_toc("ncx");
        for document in &documents {
            manifest.insert(ManifestItem::new(document.id.as_str(), document.href.as_str(), XHTML_MEDIA_TYPE))?;
            spine.push(SpineItem::new(document.id.as_str()));
        }
        for (index, asset) in assets.iter().enumerate() {
            manifest.insert(ManifestItem::new(
                format!("img{}", index + 1),
                format!("images/{}", asset.filename),
                asset.media_type,
            ))?;
        }

        let ncx = Ncx::new(self.metadata.identifier.as_str(), self.metadata.title.as_str(), nav_map);
        let opf = Opf::new(self.metadata.clone(), manifest, spine);
        opf.check_references()?;
        check_navigation(&opf, &ncx, &anchors)?;

        let mut files = vec![
            PackageFile::new(CONTAINER_PATH, Container::for_opf(&content_path(OPF_HREF)).to_xml()?),
            PackageFile::new(content_path(OPF_HREF), opf.to_xml()?),
            PackageFile::new(content_path(NCX_HREF), ncx.to_xml()?),
            PackageFile::new(content_path(NAV_HREF), ncx.to_nav_xhtml(STYLESHEET_HREF)?),
            PackageFile::new(content_path(STYLESHEET_HREF), STYLESHEET),
        ];
        for document in &documents {
            files.push(PackageFile::new(
                content_path(&document.href),
                document.document.to_bytes(XmlStyle::Xhtml)?,
            ));
        }
        for asset in assets.iter() {
            files.push(PackageFile::new(
                content_path(&format!("images/{}", asset.filename)),
                asset.bytes.clone(),
            ));
        }

        log::info!(
            "EPUB包已组装: {} 个内容文档, {} 张图片, {} 个导航点",
            documents.len(),
            assets.len(),
            ncx.nav_map.len()
        );
        Ok(EpubPackage { opf, ncx, files })
    }
}

/// 每个导航目标的文件必须在清单中，带锚点的目标其锚点必须存在
fn check_navigation(opf: &Opf, ncx: &Ncx, anchors: &HashSet<String>) -> Result<()> {
    for point in &ncx.nav_map.nav_points {
        if opf.manifest.get_by_href(point.target_file()).is_none() {
            return Err(EpubError::MissingManifestItem(point.src.clone()));
        }
        if let Some(anchor) = point.target_anchor() {
            if !anchors.contains(anchor) {
                return Err(EpubError::MissingManifestItem(point.src.clone()));
            }
        }
    }
    Ok(())
}

fn content_path(href: &str) -> String {
    format!("{}/{}", CONTENT_DIR, href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BookInfo;
    use crate::epub::xml::XmlElement;
    use crate::images::ImageAsset;

    fn chapter(ordinal: usize, title: &str, image: Option<&str>) -> ChapterEntry {
        let mut content = XmlElement::new("div").child(XmlElement::new("p").text(title));
        if let Some(filename) = image {
            content = content.child(XmlElement::new("img").attr("src", format!("images/{}", filename)));
        }
        ChapterEntry {
            ordinal,
            title: title.to_string(),
            source_filename: format!("1.{}.html", ordinal),
            content,
        }
    }

    fn assets(names: &[&str]) -> AssetSet {
        let mut set = AssetSet::new();
        for name in names {
            set.insert(ImageAsset {
                filename: name.to_string(),
                bytes: name.as_bytes().to_vec(),
                media_type: crate::images::media_type_for(name),
            });
        }
        set
    }

    fn assembler() -> PackageAssembler {
        PackageAssembler::new(Metadata::from_book_info(&BookInfo::default()))
    }

    #[test]
    fn test_multi_page_package() {
        let chapters = vec![chapter(1, "Introduction", Some("leaf.png")), chapter(2, "Cells", None)];
        let package = assembler()
            .assemble(&chapters, &assets(&["leaf.png"]), BuildMode::MultiPage)
            .unwrap();

        let ids: Vec<_> = package.opf.manifest.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["ncx", "nav", "css", "chapter1", "chapter2", "img1"]);
        assert_eq!(package.opf.manifest.get("nav").unwrap().properties.as_deref(), Some("nav"));
        assert_eq!(package.opf.manifest.get("img1").unwrap().href, "images/leaf.png");

        let spine: Vec<_> = package.opf.spine.items().iter().map(|item| item.idref.as_str()).collect();
        assert_eq!(spine, vec!["chapter1", "chapter2"]);

        let targets: Vec<_> = package.ncx.nav_map.nav_points.iter().map(|p| p.src.as_str()).collect();
        assert_eq!(targets, vec!["chapter1.xhtml", "chapter2.xhtml"]);
        assert_eq!(package.ncx.uid, package.opf.metadata.identifier);

        assert_eq!(package.files[0].path, "META-INF/container.xml");
        assert!(package.file("OEBPS/chapter2.xhtml").is_some());
        assert!(package.file("OEBPS/images/leaf.png").is_some());
        assert!(package.file("OEBPS/styles.css").is_some());
    }

    #[test]
    fn test_single_page_package() {
        let chapters = vec![chapter(1, "Introduction", None), chapter(2, "Cells", None)];
        let package = assembler()
            .assemble(&chapters, &AssetSet::new(), BuildMode::SinglePage)
            .unwrap();

        let spine: Vec<_> = package.opf.spine.items().iter().map(|item| item.idref.as_str()).collect();
        assert_eq!(spine, vec!["content"]);

        let targets: Vec<_> = package.ncx.nav_map.nav_points.iter().map(|p| p.src.as_str()).collect();
        assert_eq!(targets, vec!["content.xhtml#introduction", "content.xhtml#cells"]);

        let content = String::from_utf8(package.file("OEBPS/content.xhtml").unwrap().data.clone()).unwrap();
        assert!(content.contains("<section id=\"introduction\">"));
        assert!(content.contains("<section id=\"cells\">"));
        assert!(package.file("OEBPS/chapter1.xhtml").is_none());
    }

    #[test]
    fn test_duplicate_titles_get_distinct_anchors() {
        let chapters = vec![chapter(1, "Review", None), chapter(2, "Review", None)];
        let package = assembler()
            .assemble(&chapters, &AssetSet::new(), BuildMode::SinglePage)
            .unwrap();

        let targets: Vec<_> = package.ncx.nav_map.nav_points.iter().map(|p| p.src.as_str()).collect();
        assert_eq!(targets, vec!["content.xhtml#review", "content.xhtml#review-2"]);
    }

    #[test]
    fn test_images_are_listed_once_in_filename_order() {
        let chapters = vec![chapter(1, "A", Some("b.svg")), chapter(2, "B", Some("a.gif"))];
        let package = assembler()
            .assemble(&chapters, &assets(&["b.svg", "a.gif"]), BuildMode::MultiPage)
            .unwrap();

        let images: Vec<_> = package
            .opf
            .manifest
            .iter()
            .filter(|item| item.is_image())
            .map(|item| (item.id.as_str(), item.href.as_str(), item.media_type.as_str()))
            .collect();
        assert_eq!(
            images,
            vec![("img1", "images/a.gif", "image/gif"), ("img2", "images/b.svg", "image/svg+xml")]
        );
    }

    #[test]
    fn test_no_chapters_is_an_error() {
        let result = assembler().assemble(&[], &AssetSet::new(), BuildMode::MultiPage);
        assert!(matches!(result, Err(EpubError::NoChapters)));
    }

    #[test]
    fn test_opf_contains_metadata_and_spine() {
        let package = assembler()
            .assemble(&[chapter(1, "Intro", None)], &AssetSet::new(), BuildMode::MultiPage)
            .unwrap();
        let opf = String::from_utf8(package.file("OEBPS/content.opf").unwrap().data.clone()).unwrap();

        assert!(opf.contains("<spine toc=\"ncx\">"));
        assert!(opf.contains("<itemref idref=\"chapter1\"/>"));
        assert!(opf.contains("urn:uuid:"));
    }
}
