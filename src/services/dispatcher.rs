//! Webhook 发送服务 - 业务能力层
//!
//! 把一个发票文件包以 multipart 形式发送到收集端点，每个文件包只尝试一次

use crate::config::Config;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{DispatchOutcome, InvoiceBundle};
use crate::utils::truncate_text;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// 发票号字段名
pub const INVOICE_FIELD: &str = "factura";

/// 文件包发送能力
#[allow(async_fn_in_trait)]
pub trait BundleDispatcher {
    /// 发送一个文件包，不重试
    async fn dispatch(&self, bundle: &InvoiceBundle) -> DispatchOutcome;
}

/// 发送到 webhook 的实现
pub struct WebhookDispatcher {
    client: Client,
    webhook_url: String,
    timeout: Duration,
    excerpt_len: usize,
}

impl WebhookDispatcher {
    pub fn new(config: &Config) -> PipelineResult<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            webhook_url: config.webhook_url.clone(),
            timeout: config.dispatch_timeout(),
            excerpt_len: config.excerpt_len,
        })
    }

    /// 构建 multipart 表单：`factura` + `file_0..file_n`
    fn build_form(bundle: &InvoiceBundle) -> Result<Form, reqwest::Error> {
        let mut form = Form::new().text(INVOICE_FIELD, bundle.invoice_number().to_string());
        for (i, attachment) in bundle.attachments().iter().enumerate() {
            let part = Part::bytes(attachment.content.clone())
                .file_name(attachment.filename.clone())
                .mime_str(&attachment.mime)?;
            form = form.part(format!("file_{}", i), part);
        }
        Ok(form)
    }

    /// 失败结果：消息来自 `DispatchFailed`，摘要截断到 `excerpt_len`
    fn failed(&self, status: &str, detail: &str) -> DispatchOutcome {
        let error = PipelineError::DispatchFailed {
            status: status.to_string(),
            excerpt: truncate_text(detail, self.excerpt_len),
        };
        DispatchOutcome::failed(error.to_string())
    }
}

impl BundleDispatcher for WebhookDispatcher {
    async fn dispatch(&self, bundle: &InvoiceBundle) -> DispatchOutcome {
        let form = match Self::build_form(bundle) {
            Ok(form) => form,
            Err(e) => return self.failed("multipart", &e.to_string()),
        };

        debug!(
            "发送发票 {} ({} 个文件) 到 {}",
            bundle.invoice_number(),
            bundle.len(),
            self.webhook_url
        );

        let response = match self
            .client
            .post(&self.webhook_url)
            .multipart(form)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("⚠️ webhook 请求失败: {}", e);
                return self.failed("red", &e.to_string());
            }
        };

        let status = response.status().as_u16();
        if response.status().is_success() {
            return DispatchOutcome::ok(format!("Webhook OK (status {})", status));
        }

        let body = response.text().await.unwrap_or_default();
        self.failed(&status.to_string(), &body)
    }
}
