//! 图片下载

use crate::config::FetchConfig;
use crate::epub::error::{EpubError, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// 图片获取接口
///
/// 流水线只依赖这个接口，测试中可以替换为内存实现。
pub trait ImageFetcher {
    /// 获取URL对应的字节，任何失败（网络错误、超时、非2xx状态）都返回错误
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

/// 基于阻塞HTTP客户端的图片下载器
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// 按配置创建下载器：固定超时，浏览器风格的User-Agent，不重试
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(EpubError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }
}
