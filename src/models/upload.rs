//! 上传内容及其分类

use crate::error::PipelineError;
use crate::models::bundle::Attachment;
use crate::models::progress::ProgressEvent;

/// 上传的一个文件
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, content: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            filename: filename.into(),
            content,
            content_type: content_type.unwrap_or_else(|| "application/octet-stream".to_string()),
        }
    }

    /// 文件名以 `.zip` 结尾（不区分大小写）即视为压缩包
    pub fn is_archive(&self) -> bool {
        self.filename.to_lowercase().ends_with(".zip")
    }

    pub fn into_attachment(self) -> Attachment {
        Attachment::new(self.filename, self.content, self.content_type)
    }
}

/// 一次上传：压缩包 + 散装文件 + 可选发票号
#[derive(Debug, Clone)]
pub struct Upload {
    pub archives: Vec<UploadedFile>,
    pub loose: Vec<UploadedFile>,
    pub invoice_number: Option<String>,
}

impl Upload {
    /// 校验并分类上传内容
    ///
    /// # 参数
    /// - `files`: 所有文件
    /// - `invoice_number`: 手动填写的发票号（空白视为未填写）
    ///
    /// # 返回
    /// 没有任何文件时返回 `UploadRejected`
    pub fn classify(
        files: Vec<UploadedFile>,
        invoice_number: Option<&str>,
    ) -> Result<Self, UploadRejected> {
        if files.is_empty() {
            return Err(UploadRejected {
                error: PipelineError::NoFiles,
            });
        }

        let (archives, loose): (Vec<_>, Vec<_>) = files.into_iter().partition(UploadedFile::is_archive);
        let invoice_number = invoice_number
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(Self {
            archives,
            loose,
            invoice_number,
        })
    }

    pub fn file_count(&self) -> usize {
        self.archives.len() + self.loose.len()
    }
}

/// 上传被拒绝（前置条件不满足）
#[derive(Debug)]
pub struct UploadRejected {
    pub error: PipelineError,
}

impl UploadRejected {
    /// 拒绝时返回给调用方的唯一一条记录
    pub fn record(&self) -> ProgressEvent {
        ProgressEvent::log(format!("ERROR: {}", self.error), 0)
    }
}
