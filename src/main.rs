use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use masivos_facturas::error::PipelineError;
use masivos_facturas::orchestrator::{channel, run_upload};
use masivos_facturas::services::mime_for;
use masivos_facturas::utils::logging;
use masivos_facturas::{Config, Upload, UploadedFile};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// 读取文件作为一次上传，逐行输出 NDJSON 进度
#[derive(Debug, Parser)]
#[command(name = "masivos-facturas", version)]
struct Cli {
    /// 散装文件对应的发票号
    #[arg(long, env = "FACTURA")]
    factura: Option<String>,

    /// TOML 配置文件
    #[arg(long, env = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// 上传的文件（.zip 视为压缩包，其余视为散装文件）
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env(),
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    let files = read_files(&cli.files).await?;
    let upload = match Upload::classify(files, cli.factura.as_deref()) {
        Ok(upload) => upload,
        Err(rejected) => {
            print!("{}", rejected.record().to_ndjson_line());
            return Ok(ExitCode::from(2));
        }
    };

    let (sink, events) = channel();
    let consumer = async move {
        let mut events = Box::pin(events);
        let mut stdout = std::io::stdout();
        while let Some(event) = events.next().await {
            // 管道被关闭时继续消费，让流水线走完
            let _ = stdout.write_all(event.to_ndjson_line().as_bytes());
            let _ = stdout.flush();
        }
    };

    let (result, ()) = tokio::join!(run_upload(&config, upload, sink), consumer);

    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(PipelineError::MissingInvoiceNumber) => Ok(ExitCode::from(1)),
        Err(e) => Err(e).context("处理上传失败"),
    }
}

async fn read_files(paths: &[PathBuf]) -> Result<Vec<UploadedFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("无法读取文件: {}", path.display()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_for(&filename).to_string();
        files.push(UploadedFile::new(filename, content, Some(mime)));
    }
    Ok(files)
}
