//! Response 索引服务 - 业务能力层
//!
//! 扫描共享目录（只扫一层），建立 发票号 → Response 文件路径 的映射

use crate::error::{PipelineError, PipelineResult};
use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

const DESCRIPTOR_PATTERN: &str = r"^([^_]+)_.*_Response\.txt$";

/// Response 文件名模式：`{发票号}_<任意>_Response.txt`
#[derive(Debug, Clone)]
pub struct DescriptorPattern {
    regex: Regex,
}

impl DescriptorPattern {
    pub fn new() -> PipelineResult<Self> {
        Ok(Self {
            regex: Regex::new(DESCRIPTOR_PATTERN)?,
        })
    }

    /// 从文件名中取出发票号（第一个 `_` 之前的部分）
    ///
    /// `1001_abc_Response.txt` → `Some("1001")`
    pub fn invoice_number_of<'n>(&self, file_name: &'n str) -> Option<&'n str> {
        self.regex
            .captures(file_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// 发票号 → Response 文件路径
///
/// 每次运行重新构建，运行结束即丢弃。文件内容不缓存，查询时再读取
#[derive(Debug, Default, Clone)]
pub struct ResponseIndex {
    entries: HashMap<String, PathBuf>,
}

impl ResponseIndex {
    /// 扫描目录建立索引
    ///
    /// 同一个发票号有多个 Response 文件时，按文件名字典序取第一个，
    /// 结果不依赖文件系统的遍历顺序
    ///
    /// # 参数
    /// - `dir`: 共享目录
    ///
    /// # 返回
    /// 目录不存在或不可读时返回 `IndexUnavailable`
    pub async fn build(dir: &Path) -> PipelineResult<Self> {
        let pattern = DescriptorPattern::new()?;
        let unavailable = |source| PipelineError::IndexUnavailable {
            path: dir.display().to_string(),
            source,
        };

        let mut reader = fs::read_dir(dir).await.map_err(unavailable)?;
        let mut candidates = Vec::new();

        loop {
            let entry = match reader.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => return Err(unavailable(e)),
            };

            let is_file = match entry.file_type().await {
                Ok(file_type) => file_type.is_file(),
                Err(e) => {
                    debug!("跳过无法读取类型的条目 {:?}: {}", entry.path(), e);
                    continue;
                }
            };
            if !is_file {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if pattern.invoice_number_of(&name).is_some() {
                candidates.push((name, entry.path()));
            }
        }

        candidates.sort_by(|a, b| a.0.cmp(&b.0));

        let mut entries = HashMap::new();
        for (name, path) in candidates {
            if let Some(number) = pattern.invoice_number_of(&name) {
                entries.entry(number.to_string()).or_insert(path);
            }
        }

        debug!("索引完成: {} 个 Response 文件", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, invoice_number: &str) -> Option<&Path> {
        self.entries.get(invoice_number).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 读取并解析 Response 文件（每次都从磁盘读取）
pub async fn load_descriptor(path: &Path) -> PipelineResult<serde_json::Value> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| PipelineError::DescriptorUnreadable {
            path: path.display().to_string(),
            source,
        })?;

    serde_json::from_str(content.trim()).map_err(|source| PipelineError::DescriptorMalformed {
        path: path.display().to_string(),
        source,
    })
}
