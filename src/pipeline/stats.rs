//! 构建统计

/// 一次构建过程中的计数与错误记录
///
/// 由构建器创建并以可变引用传入各阶段，构建结束后随 [`BuildReport`](crate::pipeline::BuildReport) 返回。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statistics {
    /// 成功处理的章节数
    pub chapters: usize,
    /// 发现的图片引用数
    pub images_found: usize,
    /// 下载成功的图片数
    pub images_downloaded: usize,
    /// 下载失败的图片数
    pub images_failed: usize,
    /// 文件名相同但内容不同的图片数
    pub image_collisions: usize,
    /// 非致命错误信息，按发生顺序
    pub errors: Vec<String>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一条非致命错误
    pub fn record_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// 最多列出 `limit` 条错误，超出部分汇总为一行
    pub fn error_summary(&self, limit: usize) -> Vec<String> {
        let mut lines: Vec<String> = self.errors.iter().take(limit).cloned().collect();
        if self.errors.len() > limit {
            lines.push(format!("... 以及另外 {} 个错误", self.errors.len() - limit));
        }
        lines
    }
}
