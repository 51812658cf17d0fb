//! 程序配置
//!
//! 加载顺序：默认值 → TOML 配置文件（可选）→ 环境变量

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "course_creator.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 课程服务 API 根地址
    pub api_base_url: String,
    /// 登录邮箱
    pub email: String,
    /// 登录密码
    pub password: String,
    /// 待处理文档所在目录
    pub input_folder: String,
    /// 识别的文档扩展名（不带点）
    pub document_extension: String,
    /// 普通请求超时（秒）
    pub request_timeout_secs: u64,
    /// 创建课程请求超时（秒），服务端处理较慢
    pub create_timeout_secs: u64,
    /// 两个文档之间的间隔（毫秒）
    pub item_delay_ms: u64,
    /// 运行日志文件
    pub output_log_file: String,
    /// 创建超时待核对记录文件
    pub reconciliation_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://app.penseum.com/api-handler".to_string(),
            email: String::new(),
            password: String::new(),
            input_folder: "studocu".to_string(),
            document_extension: "pdf".to_string(),
            request_timeout_secs: 30,
            create_timeout_secs: 150,
            item_delay_ms: 2000,
            output_log_file: "output.txt".to_string(),
            reconciliation_file: "pending_courses.txt".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载完整配置
    ///
    /// 配置文件路径取自 `COURSE_CREATOR_CONFIG`，未设置时若当前目录存在
    /// `course_creator.toml` 则读取它。
    pub fn load() -> Result<Self> {
        let base = match std::env::var("COURSE_CREATOR_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        Ok(base.with_env_overrides())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("无法解析配置文件: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: env_string("PENSEUM_API_BASE_URL").unwrap_or(self.api_base_url),
            email: env_string("PENSEUM_EMAIL").unwrap_or(self.email),
            password: env_string("PENSEUM_PASSWORD").unwrap_or(self.password),
            input_folder: env_string("INPUT_FOLDER").unwrap_or(self.input_folder),
            document_extension: env_string("DOCUMENT_EXTENSION").unwrap_or(self.document_extension),
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS").unwrap_or(self.request_timeout_secs),
            create_timeout_secs: env_parsed("CREATE_TIMEOUT_SECS").unwrap_or(self.create_timeout_secs),
            item_delay_ms: env_parsed("ITEM_DELAY_MS").unwrap_or(self.item_delay_ms),
            output_log_file: env_string("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            reconciliation_file: env_string("RECONCILIATION_FILE").unwrap_or(self.reconciliation_file),
            verbose_logging: env_parsed("VERBOSE_LOGGING").unwrap_or(self.verbose_logging),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    /// 是否配置了登录凭据
    pub fn has_credentials(&self) -> bool {
        !self.email.trim().is_empty() && !self.password.is_empty()
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
