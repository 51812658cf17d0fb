//! 用户中断信号
//!
//! 协作式取消：批处理只在两个文档之间检查，正在执行的步骤会跑完或超时。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::warn;

#[derive(Debug, Default)]
struct Inner {
    cancelled: AtomicBool,
    notify: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// 等待取消
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    /// 运行 `future`，中断时放弃等待并返回 `None`
    pub async fn run_until_cancelled<F: std::future::Future>(&self, future: F) -> Option<F::Output> {
        tokio::select! {
            output = future => Some(output),
            _ = self.cancelled() => None,
        }
    }

    /// 清除上一次的中断状态（新一轮批处理前调用）
    pub fn reset(&self) {
        self.inner.cancelled.store(false, Ordering::SeqCst);
    }

    /// 监听 Ctrl-C，收到后触发取消
    ///
    /// 调用方在批处理结束后应 `abort()` 返回的任务。
    pub fn listen_for_ctrl_c(&self) -> JoinHandle<()> {
        let signal = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("⏹️ 收到中断信号，当前文档处理完后停止");
                signal.cancel();
            }
        })
    }
}
