//! HTTP 连接池 - 基础设施层
//!
//! 一次运行开始时创建，运行结束（任何退出路径）时随作用域一起释放

use crate::config::Config;
use crate::error::PipelineResult;
use reqwest::redirect::Policy;
use reqwest::Client;
use tracing::debug;

/// 连接池
///
/// 职责：
/// - 持有唯一的 reqwest `Client`（内部连接池）
/// - 只暴露 `client()` 能力
/// - 不认识发票 / 附件
pub struct ConnectionPool {
    client: Client,
}

impl ConnectionPool {
    /// 按配置创建连接池（限制每个主机的空闲连接数、超时、重定向）
    pub fn open(config: &Config) -> PipelineResult<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.download_timeout())
            .redirect(Policy::limited(config.max_redirects))
            .build()?;

        debug!(
            "连接池已创建 (每主机 {} 个连接)",
            config.pool_max_idle_per_host
        );
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Drop for ConnectionPool {
    fn drop(&mut self) {
        debug!("连接池已释放");
    }
}
