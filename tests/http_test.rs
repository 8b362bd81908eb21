mod common;

use common::{serve_once, unreachable_url};
use masivos_facturas::infrastructure::ConnectionPool;
use masivos_facturas::services::{HttpDownloader, WebhookDispatcher};
use masivos_facturas::{
    Attachment, BundleDispatcher, Config, InvoiceBundle, PdfFetcher, PipelineError,
};
use tokio_test::{assert_err, assert_ok};

fn downloader(config: &Config) -> HttpDownloader {
    HttpDownloader::new(assert_ok!(ConnectionPool::open(config)))
}

fn sample_bundle() -> InvoiceBundle {
    InvoiceBundle::new(
        "1001",
        vec![
            Attachment::new("a.json", b"{\"k\":1}".to_vec(), "application/json"),
            Attachment::new("FEV_830066626_1001.pdf", b"%PDF".to_vec(), "application/pdf"),
        ],
    )
}

#[tokio::test]
async fn test_download_returns_body() {
    let (base, server) = serve_once(200, "Content-Type: application/pdf\r\n", b"%PDF-1.4".to_vec()).await;
    let fetcher = downloader(&Config::default());

    let bytes = fetcher.fetch(&format!("{}/y.pdf", base)).await;

    assert_eq!(bytes.as_deref(), Some(&b"%PDF-1.4"[..]));
    let request = String::from_utf8_lossy(&server.await.unwrap()).into_owned();
    assert!(request.starts_with("GET /y.pdf "));
}

#[tokio::test]
async fn test_download_follows_redirects() {
    let (target, _target_server) = serve_once(200, "", b"%PDF-moved".to_vec()).await;
    let location = format!("Location: {}/final.pdf\r\n", target);
    let (base, _redirect_server) = serve_once(302, &location, Vec::new()).await;
    let fetcher = downloader(&Config::default());

    let bytes = fetcher.fetch(&format!("{}/old.pdf", base)).await;

    assert_eq!(bytes.as_deref(), Some(&b"%PDF-moved"[..]));
}

#[tokio::test]
async fn test_download_non_2xx_is_soft_failure() {
    let (base, _server) = serve_once(404, "", b"not here".to_vec()).await;
    let fetcher = downloader(&Config::default());
    let url = format!("{}/y.pdf", base);

    let err = assert_err!(fetcher.try_fetch(&url).await);
    assert!(matches!(
        err,
        PipelineError::DownloadFailed { ref reason, .. } if reason == "status 404"
    ));

    let (base, _server) = serve_once(404, "", b"not here".to_vec()).await;
    assert_eq!(fetcher.fetch(&format!("{}/y.pdf", base)).await, None);
}

#[tokio::test]
async fn test_download_network_error_is_soft_failure() {
    let fetcher = downloader(&Config::default());
    assert_eq!(fetcher.fetch(&unreachable_url().await).await, None);
}

#[tokio::test]
async fn test_dispatch_sends_invoice_and_positional_files() {
    let (base, server) = serve_once(200, "", b"ok".to_vec()).await;
    let config = Config {
        webhook_url: format!("{}/hook", base),
        ..Config::default()
    };
    let dispatcher = assert_ok!(WebhookDispatcher::new(&config));

    let outcome = dispatcher.dispatch(&sample_bundle()).await;

    assert!(outcome.success);
    assert_eq!(outcome.message, "Webhook OK (status 200)");

    let request = String::from_utf8_lossy(&server.await.unwrap()).into_owned();
    assert!(request.starts_with("POST /hook "));
    assert!(request.contains("multipart/form-data; boundary="));
    assert!(request.contains("name=\"factura\"\r\n\r\n1001\r\n"));
    assert!(request.contains("name=\"file_0\"; filename=\"a.json\""));
    assert!(request.contains("name=\"file_1\"; filename=\"FEV_830066626_1001.pdf\""));
    assert!(request.contains("Content-Type: application/pdf"));

    let factura = request.find("name=\"factura\"").unwrap();
    let file_0 = request.find("name=\"file_0\"").unwrap();
    assert!(factura < file_0);
}

#[tokio::test]
async fn test_dispatch_failure_includes_bounded_excerpt() {
    let body = "x".repeat(1000).into_bytes();
    let (base, _server) = serve_once(500, "", body).await;
    let config = Config {
        webhook_url: format!("{}/hook", base),
        excerpt_len: 50,
        ..Config::default()
    };
    let dispatcher = assert_ok!(WebhookDispatcher::new(&config));

    let outcome = dispatcher.dispatch(&sample_bundle()).await;

    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Webhook error: 500 - xxx"));
    assert!(outcome.message.len() <= "Webhook error: 500 - ".len() + 50 + 3);
}

#[tokio::test]
async fn test_dispatch_network_error_is_failure() {
    let config = Config {
        webhook_url: unreachable_url().await,
        ..Config::default()
    };
    let dispatcher = assert_ok!(WebhookDispatcher::new(&config));

    let outcome = dispatcher.dispatch(&sample_bundle()).await;

    assert!(!outcome.success);
    assert!(outcome.message.starts_with("Webhook error: red - "));
}
