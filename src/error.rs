use thiserror::Error;

/// 流水线错误类型
///
/// 除了 `MissingInvoiceNumber` 之外，其余错误都只在单张发票或单个 ZIP 的范围内生效：
/// 它们被写进进度流，流程继续往下走
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 共享目录不存在或不可读
    #[error("无法读取 Response 目录 {path}: {source}")]
    IndexUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// ZIP 数据损坏
    #[error("{0}")]
    ArchiveCorrupt(#[from] zip::result::ZipError),

    /// ZIP 内的某个文件读取失败
    #[error("{name}: {source}")]
    ArchiveEntryUnreadable {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// ZIP 内的某个文件超过大小上限（按头部声明或实际解压长度）
    #[error("{name}: supera el límite de {limit} bytes")]
    ArchiveEntryTooLarge { name: String, limit: u64 },

    /// Response 文件读取失败
    #[error("{path}: {source}")]
    DescriptorUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Response 文件不是合法 JSON
    #[error("{path}: {source}")]
    DescriptorMalformed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Response 中没有 UrlPdf
    #[error("UrlPdf no encontrado en Response")]
    AttachmentUrlMissing,

    /// PDF 下载失败（超时、网络错误、非 2xx）
    #[error("descarga fallida {url}: {reason}")]
    DownloadFailed { url: String, reason: String },

    /// webhook 拒绝或无法送达；`status` 是状态码，网络错误时为 `red`
    #[error("Webhook error: {status} - {excerpt}")]
    DispatchFailed { status: String, excerpt: String },

    /// 散装文件模式下没有提供发票号
    #[error("Archivos sueltos requieren número de factura")]
    MissingInvoiceNumber,

    /// 没有收到任何文件
    #[error("No se recibieron archivos")]
    NoFiles,

    /// 配置文件读取或解析失败
    #[error("配置错误 ({path}): {reason}")]
    Config { path: String, reason: String },

    /// Response 文件名模式无法编译
    #[error("文件名模式无效: {0}")]
    Pattern(#[from] regex::Error),

    /// HTTP 客户端构建失败
    #[error("HTTP 客户端初始化失败: {0}")]
    Http(#[from] reqwest::Error),
}

/// 流水线结果类型
pub type PipelineResult<T> = Result<T, PipelineError>;
