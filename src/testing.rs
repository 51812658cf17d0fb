//! 单元测试用的内存版课程服务

use crate::clients::{CourseApi, Session};
use crate::error::ApiError;
use crate::models::{CourseId, MaterialId};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    Login,
    Upload,
    Create,
    Rename,
    Publish,
}

/// 预设的响应，按调用顺序依次消费；用完后回到 `Default`
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Default,
    Json(Value),
    Status(u16),
    Timeout,
    Panic,
}

type Hook = Box<dyn Fn() + Send + Sync>;

pub(crate) struct FakeCourseApi {
    scripts: Mutex<HashMap<Op, VecDeque<Reply>>>,
    calls: Mutex<Vec<String>>,
    uploads: AtomicUsize,
    creates: AtomicUsize,
    after_publish: Option<Hook>,
}

impl FakeCourseApi {
    pub const TOKEN: &'static str = "fake-token";

    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            uploads: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            after_publish: None,
        }
    }

    pub fn with_reply(self, op: Op, reply: Reply) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(reply);
        self
    }

    pub fn with_login(self, reply: Result<Value, u16>) -> Self {
        match reply {
            Ok(body) => self.with_reply(Op::Login, Reply::Json(body)),
            Err(status) => self.with_reply(Op::Login, Reply::Status(status)),
        }
    }

    pub fn rejecting_login(self) -> Self {
        self.with_login(Err(401))
    }

    /// 每次发布调用结束后执行（用于模拟用户中断）
    pub fn after_publish(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.after_publish = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_reply(&self, op: Op) -> Reply {
        self.scripts
            .lock()
            .unwrap()
            .get_mut(&op)
            .and_then(VecDeque::pop_front)
            .unwrap_or(Reply::Default)
    }

    fn resolve(&self, op: Op, endpoint: &str, default: impl FnOnce() -> Value) -> Result<Value, ApiError> {
        match self.next_reply(op) {
            Reply::Default => Ok(default()),
            Reply::Json(body) => Ok(body),
            Reply::Status(status) => Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status,
                body: String::new(),
            }),
            Reply::Timeout => Err(ApiError::Timeout {
                endpoint: endpoint.to_string(),
            }),
            Reply::Panic => panic!("scripted panic at {}", endpoint),
        }
    }
}

#[async_trait]
impl CourseApi for FakeCourseApi {
    async fn login(&self, email: &str, _password: &str) -> Result<Value, ApiError> {
        self.record(format!("login {}", email));
        self.resolve(Op::Login, "/user/login", || {
            json!({ "access_token": Self::TOKEN })
        })
    }

    async fn upload_material(
        &self,
        session: &Session,
        file_name: &str,
        _mime_type: &str,
        _content: Vec<u8>,
    ) -> Result<Value, ApiError> {
        assert_eq!(session.access_token(), Self::TOKEN);
        self.record(format!("upload {}", file_name));
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        self.resolve(Op::Upload, "/courses/upload_material", || {
            json!({ "material_id": format!("mat-{}", n) })
        })
    }

    async fn create_course(
        &self,
        session: &Session,
        material_ids: &[MaterialId],
    ) -> Result<Value, ApiError> {
        assert_eq!(session.access_token(), Self::TOKEN);
        let ids: Vec<&str> = material_ids.iter().map(MaterialId::as_str).collect();
        self.record(format!("create {}", ids.join(",")));
        let n = self.creates.fetch_add(1, Ordering::SeqCst) + 1;
        self.resolve(Op::Create, "/courses/create/v3", || {
            json!({ "course_id": format!("course-{}", n) })
        })
    }

    async fn rename_course(
        &self,
        session: &Session,
        course_id: &CourseId,
        new_name: &str,
    ) -> Result<(), ApiError> {
        assert_eq!(session.access_token(), Self::TOKEN);
        self.record(format!("rename {} {}", course_id, new_name));
        self.resolve(Op::Rename, "/courses/{id}", || json!({}))
            .map(|_| ())
    }

    async fn publish_course(
        &self,
        session: &Session,
        course_id: &CourseId,
    ) -> Result<(), ApiError> {
        assert_eq!(session.access_token(), Self::TOKEN);
        self.record(format!("publish {}", course_id));
        let result = self
            .resolve(Op::Publish, "/courses/{id}/publish", || json!({}))
            .map(|_| ());
        if let Some(hook) = &self.after_publish {
            hook();
        }
        result
    }
}

/// 在临时目录中写入一个文档
pub(crate) fn write_document(dir: &std::path::Path, name: &str) -> crate::models::DocumentRef {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4 test").unwrap();
    crate::models::DocumentRef::new(path)
}
