//! 上传处理流水线 - 编排层
//!
//! ## 职责
//!
//! 1. **散装文件**：直接作为一张发票发送（必须提供发票号）
//! 2. **ZIP**：建索引 → 拆包 → 逐张补全 PDF → 发送
//! 3. **统计**：最后总是输出一条 `done` 记录，汇总 成功/尝试 次数
//!
//! ## 资源
//!
//! 连接池在 `run_upload` 开始时创建，由下载器持有；
//! 函数返回（包括致命错误提前返回）时随作用域释放
//!
//! ## 注意
//!
//! 找不到 PDF 时发票仍然会被发送（尽力投递），文件包可能缺少 PDF。

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::infrastructure::ConnectionPool;
use crate::models::{DispatchOutcome, InvoiceBundle, Upload, UploadedFile};
use crate::orchestrator::progress::{ProgressReporter, ProgressSink};
use crate::services::{
    decompose, BundleDispatcher, HttpDownloader, PdfFetcher, ResponseIndex, WebhookDispatcher,
};
use crate::utils::logging::{log_run_start, print_final_stats};
use crate::workflow::invoice_ctx::archive_progress;
use crate::workflow::{InvoiceCtx, ReconcileFlow};
use std::path::Path;
use tracing::{error, info, warn};

/// 一次运行的发送统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &DispatchOutcome) {
        self.attempted += 1;
        if outcome.success {
            self.succeeded += 1;
        }
    }
}

/// 使用真实 HTTP 实现处理一次上传
///
/// # 参数
/// - `config`: 配置（索引目录、webhook、超时……）
/// - `upload`: 已分类的上传内容
/// - `sink`: 进度记录接收端
///
/// # 返回
/// 正常结束返回统计；散装文件缺少发票号时返回 `MissingInvoiceNumber`
pub async fn run_upload<S: ProgressSink>(
    config: &Config,
    upload: Upload,
    sink: S,
) -> PipelineResult<RunSummary> {
    let fetcher = HttpDownloader::new(ConnectionPool::open(config)?);
    let dispatcher = WebhookDispatcher::new(config)?;

    Pipeline::new(config, &fetcher, &dispatcher)
        .run(upload, sink)
        .await
}

/// 流水线
///
/// 只借用下载和发送能力，不持有任何资源
pub struct Pipeline<'a, F, D> {
    config: &'a Config,
    fetcher: &'a F,
    dispatcher: &'a D,
}

impl<'a, F: PdfFetcher, D: BundleDispatcher> Pipeline<'a, F, D> {
    pub fn new(config: &'a Config, fetcher: &'a F, dispatcher: &'a D) -> Self {
        Self {
            config,
            fetcher,
            dispatcher,
        }
    }

    /// 处理一次上传，顺序执行，不并发
    pub async fn run<S: ProgressSink>(&self, upload: Upload, sink: S) -> PipelineResult<RunSummary> {
        let mut reporter = ProgressReporter::new(sink);
        log_run_start(upload.archives.len(), upload.loose.len());

        reporter
            .log(
                format!(
                    "Recibidos {} archivo(s): {} ZIP(s), {} suelto(s)",
                    upload.file_count(),
                    upload.archives.len(),
                    upload.loose.len()
                ),
                5,
            )
            .await;

        if !upload.loose.is_empty() && upload.invoice_number.is_none() {
            let err = PipelineError::MissingInvoiceNumber;
            error!("❌ {}", err);
            reporter.log(format!("ERROR: {}", err), 0).await;
            reporter.abort();
            return Err(err);
        }

        let mut summary = RunSummary::default();
        let Upload {
            archives,
            loose,
            invoice_number,
        } = upload;

        if let Some(number) = invoice_number.filter(|_| !loose.is_empty()) {
            self.send_loose(&mut reporter, &mut summary, number, loose).await;
        }

        if !archives.is_empty() {
            self.process_archives(&mut reporter, &mut summary, &archives).await;
        }

        print_final_stats(summary.succeeded, summary.attempted);
        reporter
            .finish(format!(
                "Completado: {}/{} envío(s) exitoso(s)",
                summary.succeeded, summary.attempted
            ))
            .await;

        Ok(summary)
    }

    /// 散装文件：不做补全，直接发送
    async fn send_loose<S: ProgressSink>(
        &self,
        reporter: &mut ProgressReporter<S>,
        summary: &mut RunSummary,
        number: String,
        loose: Vec<UploadedFile>,
    ) {
        reporter
            .log(
                format!(
                    "Enviando {} archivo(s) sueltos para factura {}...",
                    loose.len(),
                    number
                ),
                15,
            )
            .await;

        let bundle = InvoiceBundle::new(
            number,
            loose.into_iter().map(UploadedFile::into_attachment).collect(),
        );
        for attachment in bundle.attachments() {
            reporter.log(format!("  → {}", attachment.filename), 20).await;
        }

        reporter.log("Enviando al webhook...", 40).await;
        let outcome = self.dispatcher.dispatch(&bundle).await;
        summary.record(&outcome);
        reporter
            .log(format!("Factura {}: {}", bundle.invoice_number(), outcome.message), 50)
            .await;
    }

    /// ZIP：建索引、拆包、逐张补全并发送
    async fn process_archives<S: ProgressSink>(
        &self,
        reporter: &mut ProgressReporter<S>,
        summary: &mut RunSummary,
        archives: &[UploadedFile],
    ) {
        reporter.log("Indexando archivos Response en la red...", 55).await;
        let index = match ResponseIndex::build(Path::new(&self.config.response_dir)).await {
            Ok(index) => index,
            Err(e) => {
                warn!("⚠️ {}", e);
                reporter
                    .log(format!("AVISO: índice no disponible ({})", e), 55)
                    .await;
                ResponseIndex::default()
            }
        };
        reporter
            .log(format!("Índice listo: {} Response(s)", index.len()), 58)
            .await;

        let flow = ReconcileFlow::new(&index, self.fetcher, &self.config.pdf_prefix);
        let archive_count = archives.len();

        for (archive_index, archive) in archives.iter().enumerate() {
            let start = archive_progress(archive_index, archive_count, 0, 1);
            reporter
                .log(format!("Procesando ZIP: {}", archive.filename), start)
                .await;

            let folders = match decompose(&archive.content, self.config.max_entry_size) {
                Ok(folders) => folders,
                Err(e) => {
                    warn!("⚠️ ZIP {} 解压失败: {}", archive.filename, e);
                    reporter
                        .log(format!("ERROR extrayendo ZIP {}: {}", archive.filename, e), start)
                        .await;
                    continue;
                }
            };

            let invoice_count = folders.len();
            info!("📦 {}: {} 张发票", archive.filename, invoice_count);
            reporter
                .log(
                    format!(
                        "  {} factura(s) encontrada(s) en {}",
                        invoice_count, archive.filename
                    ),
                    start,
                )
                .await;

            for (invoice_index, (number, attachments)) in folders.into_iter().enumerate() {
                let ctx = InvoiceCtx::new(
                    number.clone(),
                    (archive_index, archive_count),
                    (invoice_index, invoice_count),
                );
                let base = ctx.progress_base();
                let mut bundle = InvoiceBundle::new(number, attachments);

                let result = flow.run(&mut bundle, &ctx).await;
                reporter
                    .log(
                        format!("  Factura {}: {}", ctx.invoice_number, result.describe(&bundle)),
                        base,
                    )
                    .await;

                reporter
                    .log(
                        format!(
                            "  Factura {}: enviando {} archivo(s)...",
                            ctx.invoice_number,
                            bundle.len()
                        ),
                        base + 2,
                    )
                    .await;
                let outcome = self.dispatcher.dispatch(&bundle).await;
                summary.record(&outcome);
                reporter
                    .log(format!("  Factura {}: {}", ctx.invoice_number, outcome.message), base + 4)
                    .await;
            }
        }
    }
}
