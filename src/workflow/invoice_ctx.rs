//! 发票处理上下文
//!
//! 封装"我正在处理第几个 ZIP 的第几张发票"这一信息

use std::fmt::Display;

/// ZIP 阶段在总进度中占用的区间
pub const ARCHIVE_BAND_START: u8 = 62;
pub const ARCHIVE_BAND_END: u8 = 92;

/// 发票处理上下文
#[derive(Debug, Clone)]
pub struct InvoiceCtx {
    /// 发票号
    pub invoice_number: String,

    /// ZIP 在本次上传中的索引（从0开始）
    pub archive_index: usize,

    /// 本次上传的 ZIP 总数
    pub archive_count: usize,

    /// 发票在 ZIP 中的索引（从0开始，按发票号字典序）
    pub invoice_index: usize,

    /// 该 ZIP 中的发票总数
    pub invoice_count: usize,
}

impl InvoiceCtx {
    pub fn new(
        invoice_number: impl Into<String>,
        (archive_index, archive_count): (usize, usize),
        (invoice_index, invoice_count): (usize, usize),
    ) -> Self {
        Self {
            invoice_number: invoice_number.into(),
            archive_index,
            archive_count,
            invoice_index,
            invoice_count,
        }
    }

    /// 该发票的基础进度
    ///
    /// 每个 ZIP 平分 [62, 92] 区间，ZIP 内按发票索引线性分配，
    /// 所以 (ZIP, 发票) 越靠后，进度越大
    pub fn progress_base(&self) -> u8 {
        archive_progress(self.archive_index, self.archive_count, self.invoice_index, self.invoice_count)
    }
}

/// 第 `archive_index` 个 ZIP 中第 `invoice_index` 张发票的进度
pub fn archive_progress(
    archive_index: usize,
    archive_count: usize,
    invoice_index: usize,
    invoice_count: usize,
) -> u8 {
    let span = f64::from(ARCHIVE_BAND_END - ARCHIVE_BAND_START);
    let per_archive = span / archive_count.max(1) as f64;
    let within = invoice_index as f64 / invoice_count.max(1) as f64;
    let offset = (archive_index as f64 + within) * per_archive;
    ARCHIVE_BAND_START + offset.min(span) as u8
}

impl Display for InvoiceCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[ZIP #{} 发票 {} ({}/{})]",
            self.archive_index + 1,
            self.invoice_number,
            self.invoice_index + 1,
            self.invoice_count
        )
    }
}
