#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use assettrack::config::Config;
use assettrack::db::Database;
use assettrack::{create_router, AppState};

pub const SECRET: &str = "integration-secret-integration-secret";
/// Small enough that test payloads can land on either side
pub const THRESHOLD: u64 = 16;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub upload_dir: std::path::PathBuf,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response body is not JSON")
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with test defaults, then let the caller adjust the config
    pub async fn spawn_with(configure: impl FnOnce(&mut Config)) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let upload_dir = dir.path().join("uploads");

        let mut config = Config::default();
        config.jwt.secret = SECRET.to_string();
        config.storage.upload_path = upload_dir.to_string_lossy().into_owned();
        config.storage.inline_threshold_bytes = THRESHOLD;
        configure(&mut config);

        let db = Database::in_memory().await.expect("in-memory database");
        db.run_migrations().await.expect("migrations");

        let state = AppState::new(db, config);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            upload_dir,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call");

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body")
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, token, Body::empty(), None))
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request(Method::DELETE, uri, token, Body::empty(), None))
            .await
    }

    pub async fn post_json(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.send(request(
            Method::POST,
            uri,
            token,
            Body::from(body.to_string()),
            Some("application/json"),
        ))
        .await
    }

    /// POST JSON and return the created row's id
    pub async fn create(&self, uri: &str, body: Value) -> i64 {
        let response = self.post_json(uri, None, body).await;
        assert_eq!(response.status, StatusCode::CREATED, "create {}", uri);
        response.json()["data"]["id"].as_i64().expect("created id")
    }

    /// Register an employee and return its id
    pub async fn register(&self, username: &str, password: &str) -> i64 {
        let response = self
            .post_json(
                "/api/employee",
                None,
                serde_json::json!({
                    "full_name": format!("{} Test", username),
                    "phone": "+100",
                    "email": format!("{}@example.com", username),
                    "username": username,
                    "password": password,
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "register {}", username);
        response.json()["data"]["id"].as_i64().expect("employee id")
    }

    pub async fn login(&self, username: &str, password: &str) -> TestResponse {
        self.send(request(
            Method::POST,
            "/token",
            None,
            Body::from(format!("username={}&password={}", username, password)),
            Some("application/x-www-form-urlencoded"),
        ))
        .await
    }

    /// Register and log in, returning (employee id, access token)
    pub async fn employee_with_token(&self, username: &str) -> (i64, String) {
        let id = self.register(username, "pa55word").await;
        let response = self.login(username, "pa55word").await;
        assert_eq!(response.status, StatusCode::OK);
        let token = response.json()["access_token"]
            .as_str()
            .expect("access token")
            .to_string();
        (id, token)
    }

    pub async fn upload(&self, token: &str, file_name: &str, content: &[u8]) -> TestResponse {
        self.upload_to("/api/filemain", token, file_name, content)
            .await
    }

    pub async fn upload_to(
        &self,
        uri: &str,
        token: &str,
        file_name: &str,
        content: &[u8],
    ) -> TestResponse {
        let (content_type, body) = multipart("file", file_name, content);
        self.send(request(
            Method::POST,
            uri,
            Some(token),
            Body::from(body),
            Some(&content_type),
        ))
        .await
    }
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Body,
    content_type: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(body).expect("request")
}

/// Single-field multipart/form-data body
pub fn multipart(field: &str, file_name: &str, content: &[u8]) -> (String, Vec<u8>) {
    let boundary = "assettrack-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
