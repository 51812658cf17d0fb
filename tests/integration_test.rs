use mass_course_creator::services::{CourseCreator, MaterialUploader};
use mass_course_creator::{
    BatchAbort, BatchProcessor, Config, CourseClient, CreateError, DocumentRef, MaterialId,
    Session, UploadError,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

// ========== 本地桩服务 ==========

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl RecordedRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

enum StubResponse {
    Json(u16, Value),
    Raw(u16, &'static str),
    /// 不响应，直到客户端超时
    Hang,
}

type Router = Arc<dyn Fn(&RecordedRequest) -> StubResponse + Send + Sync>;

struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl StubServer {
    async fn start(router: impl Fn(&RecordedRequest) -> StubResponse + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let router: Router = Arc::new(router);

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let recorded = recorded.clone();
                let router = router.clone();
                tokio::spawn(async move {
                    let _ = handle(stream, recorded, router).await;
                });
            }
        });

        Self {
            base_url: format!("http://{}/api-handler", addr),
            requests,
        }
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn routes(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }
}

async fn handle(
    mut stream: TcpStream,
    recorded: Arc<Mutex<Vec<RecordedRequest>>>,
    router: Router,
) -> std::io::Result<()> {
    let request = read_request(&mut stream).await?;
    recorded.lock().unwrap().push(request.clone());

    let (status, body) = match router(&request) {
        StubResponse::Json(status, body) => (status, body.to_string()),
        StubResponse::Raw(status, body) => (status, body.to_string()),
        StubResponse::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            return Ok(());
        }
    };

    let response = format!(
        "HTTP/1.1 {} STUB\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await
}

async fn read_request(stream: &mut TcpStream) -> std::io::Result<RecordedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Err(std::io::ErrorKind::UnexpectedEof.into());
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok());
    let chunked = headers
        .iter()
        .any(|(k, v)| k == "transfer-encoding" && v.contains("chunked"));

    let mut body = buf[header_end..].to_vec();
    loop {
        let complete = match content_length {
            Some(len) => body.len() >= len,
            None if chunked => body.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if complete {
            break;
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Ok(RecordedRequest {
        method,
        path,
        headers,
        body,
    })
}

/// 正常工作的课程服务
fn happy_router(request: &RecordedRequest) -> StubResponse {
    match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/api-handler/user/login") => {
            StubResponse::Json(200, json!({ "access_token": "jwt-123" }))
        }
        ("POST", "/api-handler/courses/upload_material") => {
            StubResponse::Json(200, json!({ "material_id": "mat-abc" }))
        }
        ("POST", "/api-handler/courses/create/v3") => {
            StubResponse::Json(200, json!({ "course_id": "course-xyz" }))
        }
        ("PATCH", "/api-handler/courses/course-xyz") => StubResponse::Json(200, json!({})),
        ("POST", "/api-handler/courses/course-xyz/publish") => StubResponse::Json(200, json!({})),
        _ => StubResponse::Json(404, json!({ "detail": "not found" })),
    }
}

fn test_config(base_url: &str, dir: &std::path::Path) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        email: "ops@example.com".to_string(),
        password: "secret".to_string(),
        input_folder: dir.to_string_lossy().to_string(),
        request_timeout_secs: 5,
        create_timeout_secs: 5,
        item_delay_ms: 0,
        reconciliation_file: dir.join("pending.txt").to_string_lossy().to_string(),
        output_log_file: dir.join("output.txt").to_string_lossy().to_string(),
        ..Config::default()
    }
}

fn write_pdf(dir: &std::path::Path, name: &str) -> DocumentRef {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.4 integration").unwrap();
    DocumentRef::new(path)
}

// ========== 测试 ==========

#[tokio::test]
async fn test_batch_runs_full_workflow_over_http() {
    let server = StubServer::start(happy_router).await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.base_url, dir.path());
    write_pdf(dir.path(), "intro_to-biology.pdf");

    let documents = mass_course_creator::models::load_all_documents(&config.input_folder, "pdf")
        .await
        .unwrap();
    let client = Arc::new(CourseClient::new(&config).unwrap());
    let summary = BatchProcessor::new(client, &config).run(&documents).await;

    assert_eq!(summary.successful(), 1);
    assert_eq!(summary.failed(), 0);
    assert_eq!(summary.total, 1);
    assert_eq!(
        server.routes(),
        vec![
            "POST /api-handler/user/login",
            "POST /api-handler/courses/upload_material",
            "POST /api-handler/courses/create/v3",
            "PATCH /api-handler/courses/course-xyz",
            "POST /api-handler/courses/course-xyz/publish",
        ]
    );

    let requests = server.requests();

    let login = &requests[0];
    assert_eq!(
        login.json(),
        json!({ "email": "ops@example.com", "password": "secret" })
    );
    assert!(login.header("authorization").is_none());

    let upload = &requests[1];
    assert_eq!(upload.header("authorization"), Some("Bearer jwt-123"));
    let content_type = upload.header("content-type").unwrap();
    assert!(content_type.starts_with("multipart/form-data"));
    assert!(!content_type.contains("application/json"));
    let upload_body = String::from_utf8_lossy(&upload.body);
    assert!(upload_body.contains("filename=\"intro_to-biology.pdf\""));
    assert!(upload_body.contains("application/pdf"));

    let create = &requests[2];
    assert_eq!(create.header("authorization"), Some("Bearer jwt-123"));
    assert_eq!(create.json(), json!({ "material_id_list": ["mat-abc"] }));

    let rename = &requests[3];
    assert_eq!(rename.json(), json!({ "new_name": "intro to biology" }));
    assert_eq!(rename.header("authorization"), Some("Bearer jwt-123"));

    let publish = &requests[4];
    assert_eq!(publish.header("authorization"), Some("Bearer jwt-123"));
}

#[tokio::test]
async fn test_rejected_login_stops_before_any_upload() {
    let server = StubServer::start(|request: &RecordedRequest| {
        if request.path.ends_with("/user/login") {
            StubResponse::Json(401, json!({ "detail": "bad credentials" }))
        } else {
            happy_router(request)
        }
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.base_url, dir.path());
    let documents = vec![write_pdf(dir.path(), "a.pdf"), write_pdf(dir.path(), "b.pdf")];

    let client = Arc::new(CourseClient::new(&config).unwrap());
    let summary = BatchProcessor::new(client, &config).run(&documents).await;

    assert!(matches!(summary.aborted, Some(BatchAbort::AuthFailed(_))));
    assert_eq!(
        (summary.successful(), summary.failed(), summary.total),
        (0, 0, 0)
    );
    assert_eq!(server.routes(), vec!["POST /api-handler/user/login"]);
}

#[tokio::test]
async fn test_login_without_token_is_auth_failure() {
    let server = StubServer::start(|request: &RecordedRequest| {
        if request.path.ends_with("/user/login") {
            StubResponse::Json(200, json!({ "message": "ok" }))
        } else {
            happy_router(request)
        }
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&server.base_url, dir.path());
    let documents = vec![write_pdf(dir.path(), "a.pdf")];

    let client = Arc::new(CourseClient::new(&config).unwrap());
    let summary = BatchProcessor::new(client, &config).run(&documents).await;

    assert_eq!(
        summary.aborted,
        Some(BatchAbort::AuthFailed(
            mass_course_creator::AuthError::MissingToken
        ))
    );
    assert_eq!(summary.attempted(), 0);
}

#[tokio::test]
async fn test_slow_create_times_out_indeterminately() {
    let server = StubServer::start(|request: &RecordedRequest| {
        if request.path.ends_with("/courses/create/v3") {
            StubResponse::Hang
        } else {
            happy_router(request)
        }
    })
    .await;
    let client = CourseClient::with_timeouts(
        &server.base_url,
        Duration::from_secs(5),
        Duration::from_millis(300),
    )
    .unwrap();
    let material_ids = vec![MaterialId::parse("mat-abc").unwrap()];

    let err = CourseCreator::new(Arc::new(client))
        .create(&Session::new("jwt-123"), &material_ids)
        .await
        .unwrap_err();

    assert_eq!(err, CreateError::TimedOutIndeterminate { material_ids });
}

#[tokio::test]
async fn test_create_rejection_is_transport_error() {
    let server = StubServer::start(|request: &RecordedRequest| {
        if request.path.ends_with("/courses/create/v3") {
            StubResponse::Json(422, json!({ "detail": "unsupported material" }))
        } else {
            happy_router(request)
        }
    })
    .await;
    let client = CourseClient::with_timeouts(
        &server.base_url,
        Duration::from_secs(5),
        Duration::from_secs(5),
    )
    .unwrap();

    let err = CourseCreator::new(Arc::new(client))
        .create(
            &Session::new("jwt-123"),
            &[MaterialId::parse("mat-abc").unwrap()],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CreateError::Transport(detail) if detail.contains("422")));
}

#[tokio::test]
async fn test_upload_response_shapes() {
    let server = StubServer::start(|request: &RecordedRequest| {
        let body = String::from_utf8_lossy(&request.body).to_string();
        if body.contains("no_id.pdf") {
            StubResponse::Json(200, json!({ "status": "stored" }))
        } else if body.contains("not_json.pdf") {
            StubResponse::Raw(200, "<html>ok</html>")
        } else if body.contains("too_big.pdf") {
            StubResponse::Json(413, json!({ "detail": "too large" }))
        } else {
            happy_router(request)
        }
    })
    .await;
    let dir = tempfile::tempdir().unwrap();
    let client = CourseClient::with_timeouts(
        &server.base_url,
        Duration::from_secs(5),
        Duration::from_secs(5),
    )
    .unwrap();
    let uploader = MaterialUploader::new(Arc::new(client));
    let session = Session::new("jwt-123");

    let ok = uploader
        .upload(&session, &write_pdf(dir.path(), "fine.pdf"))
        .await
        .unwrap();
    assert_eq!(ok.as_str(), "mat-abc");

    assert_eq!(
        uploader
            .upload(&session, &write_pdf(dir.path(), "no_id.pdf"))
            .await
            .unwrap_err(),
        UploadError::MalformedResponse
    );
    assert_eq!(
        uploader
            .upload(&session, &write_pdf(dir.path(), "not_json.pdf"))
            .await
            .unwrap_err(),
        UploadError::MalformedResponse
    );
    assert!(matches!(
        uploader
            .upload(&session, &write_pdf(dir.path(), "too_big.pdf"))
            .await
            .unwrap_err(),
        UploadError::Transport(detail) if detail.contains("413")
    ));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let client = CourseClient::with_timeouts(
        &format!("http://{}", addr),
        Duration::from_secs(2),
        Duration::from_secs(2),
    )
    .unwrap();

    let err = MaterialUploader::new(Arc::new(client))
        .upload(&Session::new("jwt-123"), &write_pdf(dir.path(), "a.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, UploadError::Transport(_)));
}
