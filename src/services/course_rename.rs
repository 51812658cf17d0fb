//! 课程重命名服务 - 业务能力层
//!
//! 重命名是幂等的；失败不影响后续发布，由流程层记录。

use crate::clients::{CourseApi, Session};
use crate::error::RenameError;
use crate::models::CourseId;
use std::sync::Arc;

pub struct CourseRenamer {
    api: Arc<dyn CourseApi>,
}

impl CourseRenamer {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self { api }
    }

    pub async fn rename(
        &self,
        session: &Session,
        course_id: &CourseId,
        new_name: &str,
    ) -> Result<(), RenameError> {
        self.api
            .rename_course(session, course_id, new_name)
            .await
            .map_err(|e| RenameError {
                course_id: course_id.clone(),
                reason: e.to_string(),
            })
    }
}
