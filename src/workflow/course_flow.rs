//! 课程创建流程 - 流程层
//!
//! 核心职责：定义"一个文档"的完整处理流程
//!
//! 流程顺序：
//! 1. 上传资料（失败 → 结束）
//! 2. 创建课程（失败或超时 → 结束；超时写入待核对文件）
//! 3. 重命名（失败只记录，继续发布）
//! 4. 发布（成功与否决定整个文档的结果）
//!
//! 每个文档只走一遍，不重试。

use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::clients::{CourseApi, Session};
use crate::config::Config;
use crate::error::{CreateError, ItemFailure, RenameError};
use crate::models::ids::join_material_ids;
use crate::models::{CourseId, DocumentRef, MaterialId};
use crate::services::{
    CourseCreator, CoursePublisher, CourseRenamer, MaterialUploader, ReconciliationWriter,
};
use crate::workflow::item_ctx::ItemCtx;

/// 已发布的课程
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedCourse {
    pub course_id: CourseId,
    /// 应用的课程名称（手动模式下可能没有）
    pub name: Option<String>,
    /// 重命名失败时记录原因，不影响成功
    pub rename_error: Option<RenameError>,
}

/// 单个文档的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Success(PublishedCourse),
    Failed(ItemFailure),
}

impl ItemOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success(_))
    }

    pub fn failure(&self) -> Option<&ItemFailure> {
        match self {
            ItemOutcome::Failed(failure) => Some(failure),
            ItemOutcome::Success(_) => None,
        }
    }
}

/// 课程创建流程
///
/// - 编排 上传 → 创建 → 重命名 → 发布
/// - 决定哪一步失败会中断流程
/// - 只依赖业务能力（services），会话由调用方传入
pub struct CourseFlow {
    uploader: MaterialUploader,
    creator: CourseCreator,
    renamer: CourseRenamer,
    publisher: CoursePublisher,
    reconciliation: ReconciliationWriter,
}

impl CourseFlow {
    pub fn new(api: Arc<dyn CourseApi>, config: &Config) -> Self {
        Self::with_reconciliation(api, ReconciliationWriter::new(&config.reconciliation_file))
    }

    pub fn with_reconciliation(api: Arc<dyn CourseApi>, reconciliation: ReconciliationWriter) -> Self {
        Self {
            uploader: MaterialUploader::new(api.clone()),
            creator: CourseCreator::new(api.clone()),
            renamer: CourseRenamer::new(api.clone()),
            publisher: CoursePublisher::new(api),
            reconciliation,
        }
    }

    /// 处理一个本地文档
    ///
    /// 步骤错误都会变成 [`ItemOutcome::Failed`]；返回 `Err` 只代表意外错误。
    pub async fn run(
        &self,
        session: &Session,
        document: &DocumentRef,
        ctx: &ItemCtx,
    ) -> Result<ItemOutcome> {
        info!("{} 🚀 开始处理: {}", ctx, document.file_name());

        // ========== 步骤 1: 上传资料 ==========
        let material_id = match self.uploader.upload(session, document).await {
            Ok(id) => {
                info!("{} ✅ 上传成功，资料 ID: {}", ctx, id);
                id
            }
            Err(e) => {
                error!("{} ❌ {}", ctx, e);
                return Ok(ItemOutcome::Failed(e.into()));
            }
        };

        // ========== 步骤 2-4: 创建 → 重命名 → 发布 ==========
        self.run_from_materials(session, &[material_id], Some(&document.display_name), ctx)
            .await
    }

    /// 从已有资料 ID 开始处理（跳过上传）
    ///
    /// `name` 为 `None` 时不重命名。
    pub async fn run_from_materials(
        &self,
        session: &Session,
        material_ids: &[MaterialId],
        name: Option<&str>,
        ctx: &ItemCtx,
    ) -> Result<ItemOutcome> {
        // ========== 创建课程 ==========
        info!("{} ⏳ 正在创建课程（可能需要几分钟）...", ctx);
        let course_id = match self.creator.create(session, material_ids).await {
            Ok(id) => {
                info!("{} ✅ 课程创建成功，课程 ID: {}", ctx, id);
                id
            }
            Err(e) => {
                self.report_create_failure(&e, ctx).await;
                return Ok(ItemOutcome::Failed(e.into()));
            }
        };

        // ========== 重命名 ==========
        let rename_error = match name {
            Some(name) => match self.renamer.rename(session, &course_id, name).await {
                Ok(()) => {
                    info!("{} ✅ 课程名称已更新为: {}", ctx, name);
                    None
                }
                Err(e) => {
                    warn!("{} ⚠️ {}，继续发布...", ctx, e);
                    Some(e)
                }
            },
            None => None,
        };

        // ========== 发布 ==========
        match self.publisher.publish(session, &course_id).await {
            Ok(()) => {
                info!("{} 🎉 课程已发布: {}", ctx, name.unwrap_or(course_id.as_str()));
                Ok(ItemOutcome::Success(PublishedCourse {
                    course_id,
                    name: name.map(str::to_string),
                    rename_error,
                }))
            }
            Err(error) => {
                error!("{} ❌ {}", ctx, error);
                Ok(ItemOutcome::Failed(ItemFailure::Publish {
                    error,
                    rename_error,
                }))
            }
        }
    }

    /// 记录创建失败；超时时尽量写入待核对文件，写入失败不影响结果
    async fn report_create_failure(&self, err: &CreateError, ctx: &ItemCtx) {
        match err {
            CreateError::TimedOutIndeterminate { material_ids } => {
                warn!("{} ⏰ {}", ctx, err);
                warn!(
                    "{} 请稍后人工核对，资料 ID: {}",
                    ctx,
                    join_material_ids(material_ids)
                );
                match self.reconciliation.write(&ctx.label, material_ids).await {
                    Ok(()) => info!(
                        "{} 已写入待核对文件: {}",
                        ctx,
                        self.reconciliation.path().display()
                    ),
                    Err(e) => error!(
                        "{} ❌ 待核对记录写入失败（资料 ID: {}）: {:#}",
                        ctx,
                        join_material_ids(material_ids),
                        e
                    ),
                }
            }
            other => error!("{} ❌ {}", ctx, other),
        }
    }
}
