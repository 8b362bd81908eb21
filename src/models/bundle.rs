//! 发票文件包

/// 单个附件：(文件名, 内容, MIME)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
    pub mime: String,
}

impl Attachment {
    pub fn new(filename: impl Into<String>, content: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content,
            mime: mime.into(),
        }
    }
}

/// 一张发票对应的全部文件
///
/// 附件按插入顺序保存，只能追加，不能删除
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceBundle {
    invoice_number: String,
    attachments: Vec<Attachment>,
}

impl InvoiceBundle {
    pub fn new(invoice_number: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            attachments,
        }
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    pub fn push(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// 是否已经带有业务 PDF（`{prefix}*.pdf`，不区分大小写）
    pub fn has_business_pdf(&self, prefix: &str) -> bool {
        let prefix = prefix.to_lowercase();
        self.attachments.iter().any(|a| {
            let name = a.filename.to_lowercase();
            name.starts_with(&prefix) && name.ends_with(".pdf")
        })
    }
}

/// 一次 webhook 发送的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub success: bool,
    pub message: String,
}

impl DispatchOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
