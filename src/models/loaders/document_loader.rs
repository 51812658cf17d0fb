use crate::models::document::DocumentRef;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 从文件夹中加载所有指定扩展名的文档，按文件名排序
pub async fn load_all_documents(folder_path: &str, extension: &str) -> Result<Vec<DocumentRef>> {
    let folder = PathBuf::from(folder_path);

    if !folder.exists() {
        anyhow::bail!("文件夹不存在: {}", folder_path);
    }

    let mut paths = Vec::new();
    let mut entries = fs::read_dir(&folder)
        .await
        .with_context(|| format!("无法读取文件夹: {}", folder_path))?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if has_extension(&path, extension) && entry.file_type().await?.is_file() {
            paths.push(path);
        }
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let documents: Vec<DocumentRef> = paths.into_iter().map(DocumentRef::new).collect();
    tracing::debug!("在 {} 中找到 {} 个文档", folder_path, documents.len());

    Ok(documents)
}

/// 取第一个文档（用于单个文档试运行）
pub async fn load_first_document(folder_path: &str, extension: &str) -> Result<Option<DocumentRef>> {
    let documents = load_all_documents(folder_path, extension).await?;

    if documents.is_empty() {
        tracing::warn!("在文件夹 {} 中没有找到 .{} 文件", folder_path, extension);
    }

    Ok(documents.into_iter().next())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
