use crate::error::PipelineError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 程序配置
///
/// 所有业务常量（回调地址、PDF 前缀、超时）都从这里注入，
/// 测试时可以指向假的端点
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Response 描述文件所在的共享目录
    pub response_dir: String,
    /// PDF 附件的业务前缀
    pub pdf_prefix: String,
    /// 收集端点（webhook）地址
    pub webhook_url: String,
    /// PDF 下载超时（秒）
    pub download_timeout_secs: u64,
    /// 发送到 webhook 的超时（秒）
    pub dispatch_timeout_secs: u64,
    /// 每个主机保留的空闲连接数
    pub pool_max_idle_per_host: usize,
    /// 下载时最多跟随的重定向次数
    pub max_redirects: usize,
    /// 失败时截取响应体的最大长度
    pub excerpt_len: usize,
    /// ZIP 内单个文件解压后的最大字节数
    pub max_entry_size: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            response_dir: r"\\sv-sys-05\Hosvi_Anex_Fact\FACTURAS".to_string(),
            pdf_prefix: "FEV_830066626_".to_string(),
            webhook_url:
                "https://n8n.medihelpservices.com/webhook-test/8f5dc3f2-4066-4497-a65d-5b9b50c0f2bd"
                    .to_string(),
            download_timeout_secs: 30,
            dispatch_timeout_secs: 120,
            pool_max_idle_per_host: 10,
            max_redirects: 10,
            excerpt_len: 200,
            max_entry_size: 100 * 1024 * 1024,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 默认值 + 环境变量
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 默认值 + TOML 文件 + 环境变量
    ///
    /// # 参数
    /// - `path`: TOML 配置文件路径，文件中所有键都是可选的
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| PipelineError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| PipelineError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(config.with_env_overrides())
    }

    /// 从 TOML 文本解析配置，缺失的键使用默认值
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Self {
        Self {
            response_dir: std::env::var("RESPONSE_DIR").unwrap_or(self.response_dir),
            pdf_prefix: std::env::var("PDF_PREFIX").unwrap_or(self.pdf_prefix),
            webhook_url: std::env::var("WEBHOOK_URL").unwrap_or(self.webhook_url),
            download_timeout_secs: env_parse("DOWNLOAD_TIMEOUT_SECS").unwrap_or(self.download_timeout_secs),
            dispatch_timeout_secs: env_parse("DISPATCH_TIMEOUT_SECS").unwrap_or(self.dispatch_timeout_secs),
            pool_max_idle_per_host: env_parse("POOL_MAX_IDLE_PER_HOST").unwrap_or(self.pool_max_idle_per_host),
            max_redirects: env_parse("MAX_REDIRECTS").unwrap_or(self.max_redirects),
            excerpt_len: env_parse("EXCERPT_LEN").unwrap_or(self.excerpt_len),
            max_entry_size: env_parse("MAX_ENTRY_SIZE").unwrap_or(self.max_entry_size),
            verbose_logging: env_parse("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
        }
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
