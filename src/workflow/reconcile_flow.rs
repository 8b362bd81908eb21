//! 发票补全流程 - 流程层
//!
//! 核心职责：定义"一张发票"补全 PDF 的流程
//!
//! 流程顺序：
//! 1. 已有业务 PDF → 跳过
//! 2. 查索引 → 读 Response → 找 UrlPdf → 下载 → 追加附件
//!
//! 任何一步失败都只是少一个 PDF，发票照样发送

use crate::error::PipelineError;
use crate::models::{Attachment, InvoiceBundle};
use crate::services::mime::PDF_MIME;
use crate::services::{find_pdf_url, load_descriptor, PdfFetcher, ResponseIndex};
use crate::workflow::invoice_ctx::InvoiceCtx;
use tracing::{debug, info, warn};

/// 补全结果
#[derive(Debug)]
pub enum ReconcileResult {
    /// 文件包里已经有业务 PDF，未做任何网络请求
    AlreadyComplete,
    /// PDF 下载成功并已追加
    Attached,
    /// 索引中没有该发票的 Response
    NoDescriptor,
    /// Response 读取或解析失败
    DescriptorError(PipelineError),
    /// Response 中没有 UrlPdf
    UrlMissing,
    /// 下载失败，带失败原因
    DownloadFailed(PipelineError),
}

impl ReconcileResult {
    /// 进度流中使用的描述
    pub fn describe(&self, bundle: &InvoiceBundle) -> String {
        match self {
            ReconcileResult::AlreadyComplete => {
                format!("PDF ya incluido ({} archivos)", bundle.len())
            }
            ReconcileResult::Attached => "PDF descargado OK".to_string(),
            ReconcileResult::NoDescriptor => "sin Response en la red".to_string(),
            ReconcileResult::DescriptorError(e) => format!("ERROR leyendo Response: {}", e),
            ReconcileResult::UrlMissing => PipelineError::AttachmentUrlMissing.to_string(),
            ReconcileResult::DownloadFailed(e) => format!("FAIL descargando PDF: {}", e),
        }
    }
}

/// 发票补全流程
///
/// - 不持有连接池，只借用下载能力
/// - 只处理单张发票
pub struct ReconcileFlow<'a, F> {
    index: &'a ResponseIndex,
    fetcher: &'a F,
    pdf_prefix: &'a str,
}

impl<'a, F: PdfFetcher> ReconcileFlow<'a, F> {
    pub fn new(index: &'a ResponseIndex, fetcher: &'a F, pdf_prefix: &'a str) -> Self {
        Self {
            index,
            fetcher,
            pdf_prefix,
        }
    }

    /// 下载后追加的附件名：`{prefix}{发票号}.pdf`
    pub fn pdf_name(&self, invoice_number: &str) -> String {
        format!("{}{}.pdf", self.pdf_prefix, invoice_number)
    }

    /// 补全一张发票
    ///
    /// # 参数
    /// - `bundle`: 文件包，成功时会追加一个 PDF
    /// - `ctx`: 上下文（仅用于日志）
    pub async fn run(&self, bundle: &mut InvoiceBundle, ctx: &InvoiceCtx) -> ReconcileResult {
        if bundle.has_business_pdf(self.pdf_prefix) {
            debug!("{} PDF 已存在，跳过下载", ctx);
            return ReconcileResult::AlreadyComplete;
        }

        let Some(path) = self.index.get(bundle.invoice_number()) else {
            info!("{} 索引中没有 Response", ctx);
            return ReconcileResult::NoDescriptor;
        };

        let descriptor = match load_descriptor(path).await {
            Ok(value) => value,
            Err(e) => {
                warn!("{} ⚠️ {}", ctx, e);
                return ReconcileResult::DescriptorError(e);
            }
        };

        let Some(url) = find_pdf_url(&descriptor) else {
            info!("{} Response 中没有 UrlPdf", ctx);
            return ReconcileResult::UrlMissing;
        };

        match self.fetcher.try_fetch(url).await {
            Ok(bytes) => {
                let name = self.pdf_name(bundle.invoice_number());
                info!("{} ✓ PDF 下载成功: {} ({} 字节)", ctx, name, bytes.len());
                bundle.push(Attachment::new(name, bytes, PDF_MIME));
                ReconcileResult::Attached
            }
            Err(e) => {
                warn!("{} ⚠️ {}", ctx, e);
                ReconcileResult::DownloadFailed(e)
            }
        }
    }
}
