//! # Masivos Facturas
//!
//! 发票文件包补全与批量投递
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 连接池），只暴露能力
//!
//! ### ② 业务能力层（Services）
//! - `ResponseIndex` - 扫描共享目录，发票号 → Response 文件
//! - `find_pdf_url` - 在 Response JSON 中查找 UrlPdf
//! - `HttpDownloader` - 下载 PDF（软失败）
//! - `decompose` - 把 ZIP 拆成按发票分组的附件
//! - `WebhookDispatcher` - 把文件包发送到收集端点
//!
//! ### ③ 流程层（Workflow）
//! - `ReconcileFlow` - 一张发票的补全流程（已有 PDF → 跳过；否则 索引 → 查找 → 下载）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pipeline` - 一次上传的完整流程与统计
//! - `orchestrator/progress` - 进度记录（NDJSON）
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{PipelineError, PipelineResult};
pub use models::{Attachment, DispatchOutcome, InvoiceBundle, ProgressEvent, Upload, UploadedFile};
pub use orchestrator::{run_upload, Pipeline, ProgressSink, RunSummary};
pub use services::{BundleDispatcher, PdfFetcher};
