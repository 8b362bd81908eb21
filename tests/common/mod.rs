#![allow(dead_code)]

use masivos_facturas::{
    BundleDispatcher, DispatchOutcome, InvoiceBundle, PdfFetcher, PipelineError, PipelineResult,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Write};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// 在内存中构建 ZIP
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// 记录调用的假下载器
#[derive(Default)]
pub struct FakeFetcher {
    pub responses: HashMap<String, Vec<u8>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn with(url: &str, bytes: &[u8]) -> Self {
        let mut fetcher = Self::default();
        fetcher.responses.insert(url.to_string(), bytes.to_vec());
        fetcher
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl PdfFetcher for FakeFetcher {
    async fn try_fetch(&self, url: &str) -> PipelineResult<Vec<u8>> {
        self.calls.borrow_mut().push(url.to_string());
        self.responses
            .get(url)
            .cloned()
            .ok_or_else(|| PipelineError::DownloadFailed {
                url: url.to_string(),
                reason: "status 404".to_string(),
            })
    }
}

/// 记录发送内容的假 webhook
pub struct RecordingDispatcher {
    pub bundles: RefCell<Vec<InvoiceBundle>>,
    pub succeed: bool,
}

impl RecordingDispatcher {
    pub fn ok() -> Self {
        Self {
            bundles: RefCell::new(Vec::new()),
            succeed: true,
        }
    }

    pub fn failing() -> Self {
        Self {
            bundles: RefCell::new(Vec::new()),
            succeed: false,
        }
    }

    pub fn sent(&self, invoice_number: &str) -> Vec<InvoiceBundle> {
        self.bundles
            .borrow()
            .iter()
            .filter(|b| b.invoice_number() == invoice_number)
            .cloned()
            .collect()
    }
}

impl BundleDispatcher for RecordingDispatcher {
    async fn dispatch(&self, bundle: &InvoiceBundle) -> DispatchOutcome {
        self.bundles.borrow_mut().push(bundle.clone());
        if self.succeed {
            DispatchOutcome::ok("Webhook OK (status 200)")
        } else {
            DispatchOutcome::failed("Webhook error: 500 - boom")
        }
    }
}

/// 只处理一个请求的本地 HTTP 服务
///
/// # 返回
/// (基础地址, 收到的原始请求)
pub async fn serve_once(
    status: u16,
    extra_headers: &str,
    body: Vec<u8>,
) -> (String, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let extra_headers = extra_headers.to_string();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        let head = format!(
            "HTTP/1.1 {} Test\r\nContent-Length: {}\r\nConnection: close\r\n{}\r\n",
            status,
            body.len(),
            extra_headers
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{}", addr), handle)
}

/// 一个没有人监听的地址
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/nada.pdf", addr)
}

async fn read_request(socket: &mut TcpStream) -> Vec<u8> {
    let mut request = Vec::new();
    let mut buf = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return request;
        }
        request.extend_from_slice(&buf[..n]);
        if let Some(pos) = find(&request, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok());
    let chunked = head.contains("transfer-encoding: chunked");

    loop {
        let body = &request[header_end..];
        let complete = match content_length {
            Some(len) => body.len() >= len,
            None if chunked => body.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if complete {
            return request;
        }
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return request;
        }
        request.extend_from_slice(&buf[..n]);
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
