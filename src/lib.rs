//! # Mass Course Creator
//!
//! 把本地文档批量上传为课程服务上的已发布课程
//!
//! ## 架构设计
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 课程服务 HTTP 调用
//! - `CourseApi` - 远程调用接口，`CourseClient` 为 reqwest 实现
//! - `Session` - 登录后的会话，显式传入每个请求
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个文档
//! - `SessionManager` / `MaterialUploader` / `CourseCreator` /
//!   `CourseRenamer` / `CoursePublisher` - 各自把远程错误归类为步骤错误
//! - `ReconciliationWriter` - 记录创建超时的资料 ID
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个文档"的完整处理流程
//! - `CourseFlow` - 上传 → 创建 → 重命名 → 发布
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 登录一次，顺序处理整批文档，汇总结果
//! - `app` - 交互菜单

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod testing;

// 重新导出常用类型
pub use app::App;
pub use clients::{CourseApi, CourseClient, Session};
pub use config::Config;
pub use error::{
    ApiError, AuthError, CreateError, ItemFailure, PublishError, RenameError, Stage, UploadError,
};
pub use models::{CourseId, DocumentRef, MaterialId};
pub use orchestrator::{BatchAbort, BatchProcessor, BatchSummary, CancelSignal};
pub use services::Identity;
pub use workflow::{CourseFlow, ItemCtx, ItemOutcome, PublishedCourse};
