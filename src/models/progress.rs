//! 进度记录

use serde::{Deserialize, Serialize};

/// 记录类型：中间日志或终止记录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Log,
    Done,
}

/// 进度流中的一条记录
///
/// `msg` 已带有 `[mm:ss]` 前缀
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub msg: String,
    pub progress: u8,
}

impl ProgressEvent {
    pub fn log(msg: impl Into<String>, progress: u8) -> Self {
        Self {
            kind: EventKind::Log,
            msg: msg.into(),
            progress,
        }
    }

    pub fn done(msg: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Done,
            msg: msg.into(),
            progress: 100,
        }
    }

    pub fn is_done(&self) -> bool {
        self.kind == EventKind::Done
    }

    /// 序列化为一行 NDJSON（带换行符）
    pub fn to_ndjson_line(&self) -> String {
        let mut line = serde_json::to_string(self).unwrap_or_else(|_| {
            // 三个字段都是普通字符串/整数，不会真正失败
            format!(r#"{{"type":"log","msg":"","progress":{}}}"#, self.progress)
        });
        line.push('\n');
        line
    }
}

/// 把秒数格式化为 `mm:ss`
pub fn format_elapsed(total_secs: i64) -> String {
    let secs = total_secs.max(0);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
