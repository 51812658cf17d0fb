//! 服务端返回的不透明标识

use serde::Serialize;
use std::fmt;

/// 上传资料后得到的资料 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MaterialId(String);

/// 创建课程后得到的课程 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CourseId(String);

macro_rules! opaque_id {
    ($name:ident) => {
        impl $name {
            /// 空白字符串不是合法 ID
            pub fn parse(raw: impl Into<String>) -> Option<Self> {
                let raw = raw.into();
                if raw.trim().is_empty() {
                    None
                } else {
                    Some(Self(raw))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

opaque_id!(MaterialId);
opaque_id!(CourseId);

/// 以逗号连接多个资料 ID（用于日志与核对记录）
pub fn join_material_ids(ids: &[MaterialId]) -> String {
    ids.iter()
        .map(MaterialId::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
