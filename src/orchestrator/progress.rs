//! 进度上报
//!
//! 每一步立即产出一条记录；记录的进度单调不减，最后恰好一条 `done`

use crate::models::{format_elapsed, ProgressEvent};
use chrono::{DateTime, Local};
use futures::stream::{self, Stream};
use tokio::sync::mpsc;
use tracing::debug;

/// 进度记录的接收端
#[allow(async_fn_in_trait)]
pub trait ProgressSink {
    async fn emit(&mut self, event: ProgressEvent);
}

impl ProgressSink for Vec<ProgressEvent> {
    async fn emit(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}

impl<S: ProgressSink> ProgressSink for &mut S {
    async fn emit(&mut self, event: ProgressEvent) {
        (**self).emit(event).await;
    }
}

/// 通过有界通道把记录交给消费者
///
/// 容量为 1：生产者最多领先消费者一条记录
pub struct ChannelSink {
    sender: mpsc::Sender<ProgressEvent>,
}

impl ProgressSink for ChannelSink {
    async fn emit(&mut self, event: ProgressEvent) {
        if self.sender.send(event).await.is_err() {
            debug!("进度消费者已断开，继续执行直到运行结束");
        }
    }
}

/// 创建一对 (生产端, 消费端)
pub fn channel() -> (ChannelSink, impl Stream<Item = ProgressEvent>) {
    let (sender, receiver) = mpsc::channel(1);
    let events = stream::unfold(receiver, |mut receiver| async move {
        receiver.recv().await.map(|event| (event, receiver))
    });
    (ChannelSink { sender }, events)
}

/// 进度上报器
///
/// - 每条消息加 `[mm:ss]` 前缀（从运行开始计时）
/// - 中间记录的进度被钳制为不小于上一条、不超过 99
/// - `finish` 消费自身，保证终止记录只有一条
pub struct ProgressReporter<S> {
    sink: S,
    started_at: DateTime<Local>,
    last_progress: u8,
}

impl<S: ProgressSink> ProgressReporter<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            started_at: Local::now(),
            last_progress: 0,
        }
    }

    fn elapsed(&self) -> String {
        format_elapsed((Local::now() - self.started_at).num_seconds())
    }

    /// 当前进度（用于测试和日志）
    pub fn last_progress(&self) -> u8 {
        self.last_progress
    }

    /// 发出一条中间记录
    pub async fn log(&mut self, msg: impl AsRef<str>, progress: u8) {
        let progress = progress.clamp(self.last_progress, 99);
        self.last_progress = progress;
        let event = ProgressEvent::log(format!("[{}] {}", self.elapsed(), msg.as_ref()), progress);
        self.sink.emit(event).await;
    }

    /// 发出终止记录并交还接收端
    pub async fn finish(mut self, summary: impl AsRef<str>) -> S {
        let event = ProgressEvent::done(format!("[{}] {}", self.elapsed(), summary.as_ref()));
        self.last_progress = 100;
        self.sink.emit(event).await;
        self.sink
    }

    /// 不发终止记录直接结束（致命前置条件失败）
    pub fn abort(self) -> S {
        self.sink
    }
}
