//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! pipeline (处理一次上传：散装文件 + Vec<ZIP>)
//!     ↓
//! workflow::ReconcileFlow (处理单张发票)
//!     ↓
//! services (能力层：索引 / 查找 / 下载 / 拆包 / 发送)
//!     ↓
//! infrastructure (基础设施：ConnectionPool)
//! ```
//!
//! `progress` 负责把每一步变成一条进度记录

pub mod pipeline;
pub mod progress;

pub use pipeline::{run_upload, Pipeline, RunSummary};
pub use progress::{channel, ChannelSink, ProgressReporter, ProgressSink};
