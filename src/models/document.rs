use std::path::{Path, PathBuf};

/// 待处理的本地文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    /// 文件路径
    pub path: PathBuf,
    /// 由文件名推导出的课程名称
    pub display_name: String,
}

impl DocumentRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display_name = derive_display_name(&path);
        Self { path, display_name }
    }

    /// 文件名（含扩展名），用于上传和日志
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 按扩展名推断上传用的 MIME 类型
    pub fn mime_type(&self) -> &'static str {
        match self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("pdf") => "application/pdf",
            _ => "application/octet-stream",
        }
    }
}

/// 推导课程名称：去掉扩展名，`_` 和 `-` 替换为空格
///
/// `intro_to-biology.pdf` → `intro to biology`
pub fn derive_display_name(path: &Path) -> String {
    path.file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .replace(['_', '-'], " ")
}
