//! 错误类型
//!
//! 分两层：
//! - [`ApiError`]：远程调用层，只描述"请求发生了什么"
//! - 步骤错误（[`AuthError`] / [`UploadError`] / [`CreateError`] /
//!   [`RenameError`] / [`PublishError`]）：各步骤按自己的语义归类
//!
//! 步骤错误最终汇总为 [`ItemFailure`]，不会越过单个文档的流程向上抛出。

use crate::models::ids::{join_material_ids, CourseId, MaterialId};
use std::fmt;
use thiserror::Error;

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 请求超时，服务端状态未知
    #[error("请求超时 ({endpoint})")]
    Timeout { endpoint: String },

    /// 网络请求失败（连接失败等）
    #[error("API请求失败 ({endpoint}): {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 服务端返回非 2xx 状态
    #[error("API返回错误状态 ({endpoint}): {status}, body={body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// 响应不是合法 JSON
    #[error("JSON解析失败 ({endpoint}): {message}")]
    Decode { endpoint: String, message: String },
}

impl ApiError {
    /// 从 reqwest 错误分类：超时单独归为 [`ApiError::Timeout`]
    pub fn from_reqwest(endpoint: impl Into<String>, source: reqwest::Error) -> Self {
        let endpoint = endpoint.into();
        if source.is_timeout() {
            ApiError::Timeout { endpoint }
        } else if source.is_decode() {
            ApiError::Decode {
                endpoint,
                message: source.to_string(),
            }
        } else {
            ApiError::Request { endpoint, source }
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Timeout { .. })
    }
}

/// 登录失败，整个批次无法继续
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// 服务端拒绝或无法连接
    #[error("登录失败: {0}")]
    Rejected(String),
    /// 响应中没有 access_token
    #[error("登录失败: 响应中没有 access_token")]
    MissingToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("文件不存在或无法读取: {path}")]
    NotFound { path: String },
    #[error("上传失败: 响应中没有 material_id")]
    MalformedResponse,
    #[error("上传失败: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    /// 资料 ID 列表为空，请求不会发出
    #[error("创建课程失败: 资料 ID 列表为空")]
    NoMaterials,
    #[error("创建课程失败: 响应中没有 course_id")]
    MalformedResponse,
    #[error("创建课程失败: {0}")]
    Transport(String),
    /// 客户端放弃等待，但课程可能已在服务端创建，需要人工核对
    #[error("创建课程超时，服务端可能仍在处理 (资料 ID: {})", join_material_ids(.material_ids))]
    TimedOutIndeterminate { material_ids: Vec<MaterialId> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("课程 {course_id} 重命名失败: {reason}")]
pub struct RenameError {
    pub course_id: CourseId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("课程 {course_id} 发布失败: {reason}")]
pub struct PublishError {
    pub course_id: CourseId,
    pub reason: String,
}

/// 单个文档失败的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Upload,
    Create,
    Publish,
    /// 未被步骤归类的意外错误
    Unexpected,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Upload => "upload",
            Stage::Create => "create",
            Stage::Publish => "publish",
            Stage::Unexpected => "unexpected",
        };
        f.write_str(name)
    }
}

/// 单个文档的失败原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemFailure {
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error(transparent)]
    Create(#[from] CreateError),
    #[error("{error}")]
    Publish {
        error: PublishError,
        /// 发布前的重命名是否也失败了
        rename_error: Option<RenameError>,
    },
    #[error("处理过程中发生意外错误: {0}")]
    Unexpected(String),
}

impl ItemFailure {
    pub fn stage(&self) -> Stage {
        match self {
            ItemFailure::Upload(_) => Stage::Upload,
            ItemFailure::Create(_) => Stage::Create,
            ItemFailure::Publish { .. } => Stage::Publish,
            ItemFailure::Unexpected(_) => Stage::Unexpected,
        }
    }

    /// 是否是创建超时（需要人工核对）
    pub fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            ItemFailure::Create(CreateError::TimedOutIndeterminate { .. })
        )
    }
}
