//! ZIP 拆分服务
//!
//! 把一个 ZIP 拆成 { 顶层文件夹名（发票号）: [附件...] }

use crate::error::{PipelineError, PipelineResult};
use crate::models::Attachment;
use crate::services::mime::mime_for;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use tracing::debug;
use zip::ZipArchive;

/// 按发票号排序的附件分组（`BTreeMap` 保证字典序遍历）
pub type InvoiceFolders = BTreeMap<String, Vec<Attachment>>;

/// 拆分 ZIP
///
/// 只收集至少有两级路径（文件夹/文件）的普通文件；顶层文件和目录条目被忽略。
/// 同一文件夹内的附件保持 ZIP 中的顺序。
///
/// 头部声明的大小不可信：缓冲区按实际读到的字节增长，
/// 读取量最多到 `max_entry_size + 1`，超过上限即返回错误
///
/// # 参数
/// - `bytes`: ZIP 原始数据
/// - `max_entry_size`: 单个文件解压后的上限
///
/// # 返回
/// ZIP 损坏或有文件超限时返回错误，只影响这一个 ZIP
pub fn decompose(bytes: &[u8], max_entry_size: u64) -> PipelineResult<InvoiceFolders> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut folders = InvoiceFolders::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let path = entry.name().to_string();
        let parts: Vec<&str> = path.split('/').collect();
        if parts.len() < 2 {
            debug!("忽略没有文件夹的条目: {}", path);
            continue;
        }

        let folder = parts[0];
        let file_name = parts[parts.len() - 1];
        if folder.is_empty() || file_name.is_empty() {
            continue;
        }

        let too_large = || PipelineError::ArchiveEntryTooLarge {
            name: path.clone(),
            limit: max_entry_size,
        };
        if entry.size() > max_entry_size {
            return Err(too_large());
        }

        let mut content = Vec::new();
        entry
            .by_ref()
            .take(max_entry_size.saturating_add(1))
            .read_to_end(&mut content)
            .map_err(|source| PipelineError::ArchiveEntryUnreadable {
                name: path.clone(),
                source,
            })?;
        if content.len() as u64 > max_entry_size {
            return Err(too_large());
        }

        folders
            .entry(folder.to_string())
            .or_default()
            .push(Attachment::new(file_name, content, mime_for(file_name)));
    }

    Ok(folders)
}
