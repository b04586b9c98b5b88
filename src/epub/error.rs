use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EpubError>;

/// 组装EPUB过程中的错误类型
#[derive(Error, Debug)]
pub enum EpubError {
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),

    #[error("Zip文件错误: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML错误: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("网络请求错误: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP状态异常: {status} ({url})")]
    HttpStatus { url: String, status: u16 },

    #[error("没有找到可处理的HTML文件: {0}")]
    NoInputFiles(String),

    #[error("无效的文件匹配模式: {0}")]
    InvalidPattern(String),

    #[error("没有任何章节处理成功")]
    NoChapters,

    #[error("清单ID重复: {0}")]
    DuplicateManifestId(String),

    #[error("清单中缺少被引用的条目: {0}")]
    MissingManifestItem(String),

    #[error("文件不是有效的EPUB格式: {0}")]
    InvalidEpub(String),

    #[error("缺少mimetype文件")]
    MissingMimetype,

    #[error("无效的mimetype: {expected}, 找到: {found}")]
    InvalidMimetype { expected: String, found: String },

    #[error("container.xml解析错误: {0}")]
    ContainerParseError(String),

    #[error("配置文件错误: {0}")]
    ConfigError(String),
}
