/// 课程服务 API 抽象
///
/// 步骤和流程只依赖这个 trait，真实实现是 [`super::CourseClient`]，
/// 测试中可以替换为内存实现。
use crate::error::ApiError;
use crate::models::{CourseId, MaterialId};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

/// 登录后得到的会话
///
/// 显式传给每个请求，由请求自己附加 `Authorization: Bearer <token>`。
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    access_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"***")
            .finish()
    }
}

#[async_trait]
pub trait CourseApi: Send + Sync {
    /// `POST /user/login`
    async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError>;

    /// `POST /courses/upload_material`，以文件附件形式上传
    async fn upload_material(
        &self,
        session: &Session,
        file_name: &str,
        mime_type: &str,
        content: Vec<u8>,
    ) -> Result<Value, ApiError>;

    /// `POST /courses/create/v3`，耗时较长
    async fn create_course(
        &self,
        session: &Session,
        material_ids: &[MaterialId],
    ) -> Result<Value, ApiError>;

    /// `PATCH /courses/{course_id}`
    async fn rename_course(
        &self,
        session: &Session,
        course_id: &CourseId,
        new_name: &str,
    ) -> Result<(), ApiError>;

    /// `POST /courses/{course_id}/publish`
    async fn publish_course(&self, session: &Session, course_id: &CourseId)
        -> Result<(), ApiError>;
}

/// 从响应中取出 ID 字段
///
/// 接受非空字符串或数字，其余情况（缺失、null、空串）返回 `None`。
pub fn extract_id(response: &Value, key: &str) -> Option<String> {
    match response.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
