//! EPUB归档写出与校验
//!
//! 写出顺序固定：`mimetype` 作为第一个条目且不压缩，其余文件使用Deflate压缩。

use crate::epub::container::Container;
use crate::epub::error::{EpubError, Result};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// mimetype条目名
pub const MIMETYPE_PATH: &str = "mimetype";
/// EPUB的mimetype内容
pub const MIMETYPE: &str = "application/epub+zip";
/// container.xml在归档中的路径
pub const CONTAINER_PATH: &str = "META-INF/container.xml";
/// 暂存目录中由本工具写出的子目录
const STAGED_DIRS: [&str; 2] = ["META-INF", "OEBPS"];

/// 归档中的一个文件（不含mimetype）
#[derive(Debug, Clone, PartialEq)]
pub struct PackageFile {
    /// 归档内路径，如 `OEBPS/chapter1.xhtml`
    pub path: String,
    pub data: Vec<u8>,
}

impl PackageFile {
    pub fn new(path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            data: data.into(),
        }
    }
}

/// 把归档内容按相同布局写到暂存目录
///
/// 只清除上次运行写出的 `mimetype`、`META-INF/` 和 `OEBPS/`，
/// 目录中的其他文件保持不动。
pub fn write_staging<P: AsRef<Path>>(files: &[PackageFile], dir: P) -> Result<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    clear_staged_entries(dir)?;

    fs::write(dir.join(MIMETYPE_PATH), MIMETYPE)?;
    for file in files {
        let target = staging_path(dir, &file.path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, &file.data)?;
    }

    log::info!("暂存目录已写出: {} ({} 个文件)", dir.display(), files.len() + 1);
    Ok(())
}

fn clear_staged_entries(dir: &Path) -> Result<()> {
    let file = dir.join(MIMETYPE_PATH);
    if file.is_file() {
        fs::remove_file(&file)?;
    }
    for name in STAGED_DIRS {
        let sub = dir.join(name);
        if sub.is_dir() {
            fs::remove_dir_all(&sub)?;
        }
    }
    Ok(())
}

fn staging_path(dir: &Path, archive_path: &str) -> PathBuf {
    archive_path
        .split('/')
        .filter(|part| !part.is_empty())
        .fold(dir.to_path_buf(), |path, part| path.join(part))
}

/// 写出EPUB归档，已存在的同名文件会被替换，返回归档字节数
pub fn write_archive<P: AsRef<Path>>(files: &[PackageFile], path: P) -> Result<u64> {
    let path = path.as_ref();
    if path.exists() {
        fs::remove_file(path)?;
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut zip = ZipWriter::new(File::create(path)?);
    zip.start_file(MIMETYPE_PATH, stored)?;
    zip.write_all(MIMETYPE.as_bytes())?;

    for file in files {
        zip.start_file(file.path.as_str(), deflated)?;
        zip.write_all(&file.data)?;
    }
    zip.finish()?;

    let size = fs::metadata(path)?.len();
    log::info!("EPUB已写出: {} ({} 字节)", path.display(), size);
    Ok(size)
}

/// 重新打开归档并检查结构
///
/// 检查步骤：
/// 1. 第一个条目是mimetype且未压缩
/// 2. mimetype内容为 `application/epub+zip`
/// 3. container.xml可解析，且其rootfile在归档中存在
pub fn verify_archive<P: AsRef<Path>>(path: P) -> Result<Container> {
    let mut archive = ZipArchive::new(File::open(path.as_ref())?)?;
    if archive.len() == 0 {
        return Err(EpubError::MissingMimetype);
    }

    {
        let mut first = archive.by_index(0)?;
        if first.name() != MIMETYPE_PATH {
            return Err(EpubError::InvalidEpub(format!(
                "第一个条目应为mimetype，实际为 {}",
                first.name()
            )));
        }
        if first.compression() != CompressionMethod::Stored {
            return Err(EpubError::InvalidEpub("mimetype条目不能被压缩".to_string()));
        }

        let mut content = String::new();
        first.read_to_string(&mut content)?;
        if content != MIMETYPE {
            return Err(EpubError::InvalidMimetype {
                expected: MIMETYPE.to_string(),
                found: content,
            });
        }
    }

    let container_xml = {
        let mut entry = archive
            .by_name(CONTAINER_PATH)
            .map_err(|_| EpubError::ContainerParseError(format!("缺少 {}", CONTAINER_PATH)))?;
        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        content
    };
    let container = Container::parse_xml(&container_xml)?;

    let opf_path = container.get_opf_path().ok_or_else(|| {
        EpubError::ContainerParseError("container.xml中没有找到有效的rootfile".to_string())
    })?;
    if archive.index_for_name(&opf_path).is_none() {
        return Err(EpubError::InvalidEpub(format!("rootfile不存在: {}", opf_path)));
    }

    log::debug!("EPUB结构校验通过: {}", path.as_ref().display());
    Ok(container)
}
