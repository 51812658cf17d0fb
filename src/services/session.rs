//! 会话服务 - 业务能力层
//!
//! 只负责"登录"能力：用账号换取 [`Session`]

use crate::clients::{extract_id, CourseApi, Session};
use crate::error::AuthError;
use std::sync::Arc;
use tracing::{debug, info};

/// 登录身份
#[derive(Clone)]
pub struct Identity {
    pub email: String,
    pub password: String,
}

impl Identity {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// 会话管理
///
/// 每次运行登录一次，得到的 [`Session`] 之后只读，不刷新。
pub struct SessionManager {
    api: Arc<dyn CourseApi>,
}

impl SessionManager {
    pub fn new(api: Arc<dyn CourseApi>) -> Self {
        Self { api }
    }

    pub async fn authenticate(&self, identity: &Identity) -> Result<Session, AuthError> {
        debug!("正在登录: {}", identity.email);

        let response = self
            .api
            .login(&identity.email, &identity.password)
            .await
            .map_err(|e| AuthError::Rejected(e.to_string()))?;

        let token = extract_id(&response, "access_token").ok_or_else(|| {
            debug!("登录响应: {}", response);
            AuthError::MissingToken
        })?;

        info!("✅ 登录成功，已获取访问令牌");
        Ok(Session::new(token))
    }
}
