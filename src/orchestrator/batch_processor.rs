//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 1. **登录一次**：整个批次共用一个 [`Session`]，登录失败则一个文档都不处理
//! 2. **顺序处理**：按输入顺序逐个交给 [`CourseFlow`]，不并发
//! 3. **节流**：两个文档之间固定间隔
//! 4. **容错**：单个文档的任何错误（包括 panic）只计为失败，批次继续
//! 5. **中断**：用户中断后停止后续文档，仍然返回已有统计

use crate::clients::{CourseApi, Session};
use crate::config::Config;
use crate::error::{AuthError, ItemFailure};
use crate::models::DocumentRef;
use crate::orchestrator::cancel::CancelSignal;
use crate::services::{Identity, SessionManager};
use crate::workflow::{CourseFlow, ItemCtx, ItemOutcome};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// 批次提前结束的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchAbort {
    /// 没有待处理的文档
    NoDocuments,
    /// 登录失败
    AuthFailed(AuthError),
}

/// 单个文档的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub document: String,
    pub outcome: ItemOutcome,
}

/// 批次统计
///
/// `total` 是本批接收的文档数；提前结束（未登录成功或无文档）时为 0。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub items: Vec<ItemReport>,
    /// 用户中断导致部分文档未处理
    pub interrupted: bool,
    pub aborted: Option<BatchAbort>,
}

impl BatchSummary {
    fn aborted(reason: BatchAbort) -> Self {
        Self {
            aborted: Some(reason),
            ..Default::default()
        }
    }

    pub fn successful(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.successful()
    }

    pub fn attempted(&self) -> usize {
        self.items.len()
    }

    /// 创建超时、需要人工核对的文档
    pub fn indeterminate(&self) -> impl Iterator<Item = &ItemReport> {
        self.items.iter().filter(|i| {
            i.outcome
                .failure()
                .is_some_and(ItemFailure::is_indeterminate)
        })
    }
}

/// 批量处理器
pub struct BatchProcessor {
    session_manager: SessionManager,
    flow: CourseFlow,
    identity: Identity,
    item_delay: Duration,
    cancel: CancelSignal,
}

impl BatchProcessor {
    pub fn new(api: Arc<dyn CourseApi>, config: &Config) -> Self {
        Self::with_flow(
            api.clone(),
            CourseFlow::new(api, config),
            Identity::new(&config.email, &config.password),
            config.item_delay(),
        )
    }

    pub fn with_flow(
        api: Arc<dyn CourseApi>,
        flow: CourseFlow,
        identity: Identity,
        item_delay: Duration,
    ) -> Self {
        Self {
            session_manager: SessionManager::new(api),
            flow,
            identity,
            item_delay,
            cancel: CancelSignal::new(),
        }
    }

    /// 中断信号，触发后在下一个文档开始前停止
    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    pub fn flow(&self) -> &CourseFlow {
        &self.flow
    }

    /// 登录（批处理和手动模式共用）
    pub async fn authenticate(&self) -> Result<Session, AuthError> {
        self.session_manager.authenticate(&self.identity).await
    }

    /// 处理一批文档
    pub async fn run(&self, documents: &[DocumentRef]) -> BatchSummary {
        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的文档，程序结束");
            return BatchSummary::aborted(BatchAbort::NoDocuments);
        }

        let session = match self.authenticate().await {
            Ok(session) => session,
            Err(e) => {
                error!("❌ {}，批处理终止", e);
                return BatchSummary::aborted(BatchAbort::AuthFailed(e));
            }
        };

        self.run_with_session(&session, documents).await
    }

    /// 使用已有会话处理一批文档
    pub async fn run_with_session(&self, session: &Session, documents: &[DocumentRef]) -> BatchSummary {
        let total = documents.len();
        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };

        info!("📚 共 {} 个文档待处理", total);

        for (idx, document) in documents.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!("⏹️ 处理已被用户中断，剩余 {} 个文档未处理", total - idx);
                summary.interrupted = true;
                break;
            }

            let ctx = ItemCtx::new(idx + 1, total, document.file_name());
            let outcome = self.process_item(session, document, &ctx).await;

            summary.items.push(ItemReport {
                document: document.file_name(),
                outcome,
            });

            if idx + 1 < total {
                self.pause().await;
            }
        }

        summary
    }

    /// 处理单个文档，兜住所有意外错误
    async fn process_item(&self, session: &Session, document: &DocumentRef, ctx: &ItemCtx) -> ItemOutcome {
        let result = AssertUnwindSafe(self.flow.run(session, document, ctx))
            .catch_unwind()
            .await;

        match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                error!("{} ❌ 处理过程中发生意外错误: {:#}", ctx, e);
                ItemOutcome::Failed(ItemFailure::Unexpected(format!("{:#}", e)))
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!("{} ❌ 处理过程中发生意外错误: {}", ctx, message);
                ItemOutcome::Failed(ItemFailure::Unexpected(message))
            }
        }
    }

    /// 文档之间的间隔，中断时提前结束
    async fn pause(&self) {
        if self.item_delay.is_zero() {
            return;
        }
        tokio::select! {
            _ = tokio::time::sleep(self.item_delay) => {}
            _ = self.cancel.cancelled() => {}
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
