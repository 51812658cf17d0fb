//! 待核对记录服务 - 业务能力层
//!
//! 只负责"把创建超时的资料写入待核对文件"能力，不关心流程

use crate::models::ids::{join_material_ids, MaterialId};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 待核对记录服务
///
/// 创建课程超时后服务端状态未知，记录下资料 ID，事后人工确认课程是否已创建。
pub struct ReconciliationWriter {
    file_path: PathBuf,
}

impl ReconciliationWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.file_path
    }

    /// 追加一条记录
    ///
    /// 格式：`时间 | 文档 | 资料 ID 列表`
    pub async fn write(&self, document: &str, material_ids: &[MaterialId]) -> Result<()> {
        debug!(
            "写入待核对记录: {} | {}",
            document,
            join_material_ids(material_ids)
        );

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .await
            .with_context(|| format!("无法打开待核对文件: {}", self.file_path.display()))?;

        let line = format!(
            "{} | {} | {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            document,
            join_material_ids(material_ids)
        );

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}
