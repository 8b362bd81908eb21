//! PDF 下载服务 - 业务能力层
//!
//! 只负责"按 URL 取回字节"，失败一律视为软失败

use crate::error::{PipelineError, PipelineResult};
use crate::infrastructure::ConnectionPool;
use tracing::{debug, warn};

/// 附件下载能力
#[allow(async_fn_in_trait)]
pub trait PdfFetcher {
    /// 下载并区分失败原因
    ///
    /// # 返回
    /// 网络错误、超时或非 2xx 时返回 `DownloadFailed`，带上原因
    async fn try_fetch(&self, url: &str) -> PipelineResult<Vec<u8>>;

    /// 下载 URL 的完整内容，失败只记日志
    ///
    /// # 返回
    /// 任何失败都返回 `None`
    async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        match self.try_fetch(url).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("⚠️ {}", e);
                None
            }
        }
    }
}

/// 基于共享连接池的 HTTP 下载器
///
/// 一次运行内所有下载复用同一个连接池，下载器随运行结束一起释放
pub struct HttpDownloader {
    pool: ConnectionPool,
}

impl HttpDownloader {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

impl PdfFetcher for HttpDownloader {
    async fn try_fetch(&self, url: &str) -> PipelineResult<Vec<u8>> {
        let failed = |reason: String| PipelineError::DownloadFailed {
            url: url.to_string(),
            reason,
        };

        let response = self
            .pool
            .client()
            .get(url)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("status {}", status.as_u16())));
        }

        let body = response.bytes().await.map_err(|e| failed(e.to_string()))?;
        debug!("PDF 下载完成: {} ({} 字节)", url, body.len());
        Ok(body.to_vec())
    }
}

