//! 课程发布服务 - 业务能力层

use crate::clients::{CourseApi, Session};
use crate::error::PublishError;
use crate::models::CourseId;
use std::sync::Arc;

pub struct CoursePublisher {
    api: Arc<dyn CourseApi>,
}

impl CoursePublisher {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self { api }
    }

    /// 发布课程；发布成功是单个文档成功的唯一条件
    pub async fn publish(&self, session: &Session, course_id: &CourseId) -> Result<(), PublishError> {
        self.api
            .publish_course(session, course_id)
            .await
            .map_err(|e| PublishError {
                course_id: course_id.clone(),
                reason: e.to_string(),
            })
    }
}
