#![allow(dead_code)]

use anyhow::Context as _;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::process::{Child, Command};
use std::sync::Arc;

#[allow(unused_imports)]
pub use freelancer_mcp_test_support::{KillOnDrop, MockServer, pick_unused_port, wait_http_ok};

pub const TEST_TOKEN: &str = "test-token";

/// One request received by the mock Freelancer API.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: &'static str,
    pub token: Option<String>,
    pub query: Vec<(String, String)>,
}

impl SeenRequest {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn params(&self, key: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }
}

#[derive(Clone, Default)]
pub struct MockApi {
    pub projects: Arc<Mutex<Vec<Value>>>,
    pub users: Arc<Mutex<Vec<Value>>>,
    pub seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockApi {
    pub fn with_records(projects: Vec<Value>, users: Vec<Value>) -> Self {
        Self {
            projects: Arc::new(Mutex::new(projects)),
            users: Arc::new(Mutex::new(users)),
            seen: Arc::default(),
        }
    }

    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().clone()
    }

    /// Serve a minimal imitation of the Freelancer REST API.
    ///
    /// Requests without the expected OAuth header get the API's 401 error envelope.
    pub async fn start(&self) -> anyhow::Result<MockServer> {
        let router = Router::new()
            .route("/api/projects/0.1/projects/active/", get(projects_active))
            .route("/api/users/0.1/users/directory/", get(users_directory))
            .with_state(self.clone());
        MockServer::start(router).await
    }

    fn record(&self, path: &'static str, headers: &HeaderMap, raw: Option<String>) -> bool {
        let token = headers
            .get("freelancer-oauth-v1")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let query = url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
            .into_owned()
            .collect();
        let authorized = token.as_deref() == Some(TEST_TOKEN);
        self.seen.lock().push(SeenRequest { path, token, query });
        authorized
    }
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "status": "error",
            "message": "You must be authenticated to perform this request",
            "error_code": "ProjectExceptionCodes.NOT_AUTHENTICATED",
            "request_id": "mock"
        })),
    )
}

async fn projects_active(
    State(api): State<MockApi>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> (StatusCode, Json<Value>) {
    if !api.record("projects/active", &headers, raw) {
        return unauthorized();
    }
    let projects = api.projects.lock().clone();
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "result": { "projects": projects, "total_count": projects.len() },
            "request_id": "mock"
        })),
    )
}

async fn users_directory(
    State(api): State<MockApi>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
) -> (StatusCode, Json<Value>) {
    if !api.record("users/directory", &headers, raw) {
        return unauthorized();
    }
    let users = api.users.lock().clone();
    (
        StatusCode::OK,
        Json(json!({
            "status": "success",
            "result": { "users": users, "total_count": users.len() },
            "request_id": "mock"
        })),
    )
}

pub fn server_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_freelancer-mcp"));
    for var in [
        "FLN_OAUTH_TOKEN",
        "FLN_URL",
        "MCP_SERVER_NAME",
        "MCP_TRANSPORT",
        "MCP_BIND",
        "LOG_FORMAT",
        "FLN_REQUEST_TIMEOUT_SECS",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("LOG_LEVEL", "debug");
    cmd
}

pub fn spawn_http_server(api_url: &str, port: u16, token: Option<&str>) -> anyhow::Result<Child> {
    let mut cmd = server_command();
    cmd.arg("--transport")
        .arg("http")
        .arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .arg("--api-url")
        .arg(api_url);
    if let Some(token) = token {
        cmd.env("FLN_OAUTH_TOKEN", token);
    }
    cmd.spawn().context("spawn freelancer-mcp")
}
