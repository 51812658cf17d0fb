/// 课程服务 HTTP 客户端
///
/// 封装所有与课程服务 API 相关的调用逻辑
use crate::clients::course_api::{CourseApi, Session};
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{CourseId, MaterialId};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, multipart, Client, RequestBuilder, Url};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const LOGIN_PATH: &str = "/user/login";
const UPLOAD_PATH: &str = "/courses/upload_material";
const CREATE_PATH: &str = "/courses/create/v3";

/// 课程服务客户端
///
/// 默认请求头只包含 `Accept`，`Content-Type` 由每个请求的 body 决定：
/// JSON 请求为 `application/json`，上传为 `multipart/form-data`。
#[derive(Debug, Clone)]
pub struct CourseClient {
    base_url: String,
    base: Url,
    http: Client,
    create_timeout: Duration,
}

impl CourseClient {
    /// 创建新的课程服务客户端
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_timeouts(
            &config.api_base_url,
            config.request_timeout(),
            config.create_timeout(),
        )
    }

    pub fn with_timeouts(
        base_url: &str,
        request_timeout: Duration,
        create_timeout: Duration,
    ) -> Result<Self> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(request_timeout)
            .build()
            .context("无法创建 HTTP 客户端")?;

        let base_url = base_url.trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .with_context(|| format!("无效的服务地址: {}", base_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("无效的服务地址: {}", base_url);
        }

        Ok(Self {
            base_url,
            base,
            http,
            create_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/courses/{id}[/action]`，课程 ID 作为单独的路径段编码
    fn course_url(&self, course_id: &CourseId, action: Option<&str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("courses").push(course_id.as_str());
            if let Some(action) = action {
                segments.push(action);
            }
        }
        url
    }

    /// 发送请求并把响应解析为 JSON
    async fn send_json(&self, endpoint: &str, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = self.send(endpoint, request).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::from_reqwest(endpoint, e))?;
        debug!("{} 响应: {}", endpoint, body);
        Ok(body)
    }

    /// 发送请求，只关心状态码
    async fn send_expect_success(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<(), ApiError> {
        self.send(endpoint, request).await?;
        Ok(())
    }

    async fn send(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl CourseApi for CourseClient {
    async fn login(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let url = self.url(LOGIN_PATH);
        debug!("登录: {}", url);

        let request = self.http.post(url).json(&json!({
            "email": email,
            "password": password
        }));

        self.send_json(LOGIN_PATH, request).await
    }

    async fn upload_material(
        &self,
        session: &Session,
        file_name: &str,
        mime_type: &str,
        content: Vec<u8>,
    ) -> Result<Value, ApiError> {
        let url = self.url(UPLOAD_PATH);
        debug!("上传资料: {} ({} 字节)", file_name, content.len());

        let part = multipart::Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| ApiError::from_reqwest(UPLOAD_PATH, e))?;
        let form = multipart::Form::new().part("file", part);

        let request = self
            .http
            .post(url)
            .bearer_auth(session.access_token())
            .multipart(form);

        self.send_json(UPLOAD_PATH, request).await
    }

    async fn create_course(
        &self,
        session: &Session,
        material_ids: &[MaterialId],
    ) -> Result<Value, ApiError> {
        let url = self.url(CREATE_PATH);
        debug!(
            "创建课程: {} 个资料, 超时 {} 秒",
            material_ids.len(),
            self.create_timeout.as_secs()
        );

        let request = self
            .http
            .post(url)
            .bearer_auth(session.access_token())
            .timeout(self.create_timeout)
            .json(&json!({ "material_id_list": material_ids }));

        self.send_json(CREATE_PATH, request).await
    }

    async fn rename_course(
        &self,
        session: &Session,
        course_id: &CourseId,
        new_name: &str,
    ) -> Result<(), ApiError> {
        let path = format!("/courses/{}", course_id);
        debug!("重命名课程: {} -> {}", course_id, new_name);

        let request = self
            .http
            .patch(self.course_url(course_id, None))
            .bearer_auth(session.access_token())
            .json(&json!({ "new_name": new_name }));

        self.send_expect_success(&path, request).await
    }

    async fn publish_course(
        &self,
        session: &Session,
        course_id: &CourseId,
    ) -> Result<(), ApiError> {
        let path = format!("/courses/{}/publish", course_id);
        debug!("发布课程: {}", course_id);

        let request = self
            .http
            .post(self.course_url(course_id, Some("publish")))
            .bearer_auth(session.access_token());

        self.send_expect_success(&path, request).await
    }
}
