//! 课程创建服务 - 业务能力层
//!
//! 创建请求在服务端耗时很长，超时由客户端单独配置（见
//! [`crate::clients::CourseClient`]）。超时不等于失败：课程可能已经创建，
//! 因此单独归为 [`CreateError::TimedOutIndeterminate`]。

use crate::clients::{extract_id, CourseApi, Session};
use crate::error::{ApiError, CreateError};
use crate::models::{CourseId, MaterialId};
use std::sync::Arc;
use tracing::debug;

pub struct CourseCreator {
    api: Arc<dyn CourseApi>,
}

impl CourseCreator {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self { api }
    }

    pub async fn create(
        &self,
        session: &Session,
        material_ids: &[MaterialId],
    ) -> Result<CourseId, CreateError> {
        if material_ids.is_empty() {
            return Err(CreateError::NoMaterials);
        }

        let response = self
            .api
            .create_course(session, material_ids)
            .await
            .map_err(|e| match e {
                ApiError::Timeout { .. } => CreateError::TimedOutIndeterminate {
                    material_ids: material_ids.to_vec(),
                },
                ApiError::Decode { .. } => CreateError::MalformedResponse,
                other => CreateError::Transport(other.to_string()),
            })?;

        extract_id(&response, "course_id")
            .and_then(CourseId::parse)
            .ok_or_else(|| {
                debug!("创建课程响应缺少 course_id: {}", response);
                CreateError::MalformedResponse
            })
    }
}
