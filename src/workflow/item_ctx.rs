//! 文档处理上下文
//!
//! 封装"我正在处理第几个文档"这一信息，只用于日志和记录

use std::fmt::Display;

#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 文档在本批中的序号（从1开始）
    pub index: usize,
    /// 本批文档总数
    pub total: usize,
    /// 文档名称（文件名，手动模式下为资料 ID）
    pub label: String,
}

impl ItemCtx {
    pub fn new(index: usize, total: usize, label: impl Into<String>) -> Self {
        Self {
            index,
            total,
            label: label.into(),
        }
    }

    /// 单独处理一个文档时使用
    pub fn single(label: impl Into<String>) -> Self {
        Self::new(1, 1, label)
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[文档 {}/{}]", self.index, self.total)
    }
}
