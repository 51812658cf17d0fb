//! 资料上传服务 - 业务能力层
//!
//! 只负责"上传一个文档，拿到 material_id"，不关心流程

use crate::clients::{extract_id, CourseApi, Session};
use crate::error::{ApiError, UploadError};
use crate::models::{DocumentRef, MaterialId};
use std::sync::Arc;
use tracing::debug;

pub struct MaterialUploader {
    api: Arc<dyn CourseApi>,
}

impl MaterialUploader {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self { api }
    }

    /// 上传文档
    ///
    /// 只有响应中带有非空 `material_id` 才算成功，不做重试。
    pub async fn upload(
        &self,
        session: &Session,
        document: &DocumentRef,
    ) -> Result<MaterialId, UploadError> {
        let content = tokio::fs::read(&document.path)
            .await
            .map_err(|_| UploadError::NotFound {
                path: document.path.display().to_string(),
            })?;

        let response = self
            .api
            .upload_material(
                session,
                &document.file_name(),
                document.mime_type(),
                content,
            )
            .await
            .map_err(|e| match e {
                ApiError::Decode { .. } => UploadError::MalformedResponse,
                other => UploadError::Transport(other.to_string()),
            })?;

        extract_id(&response, "material_id")
            .and_then(MaterialId::parse)
            .ok_or_else(|| {
                debug!("上传响应缺少 material_id: {}", response);
                UploadError::MalformedResponse
            })
    }
}
