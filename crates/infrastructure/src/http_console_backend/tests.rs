use std::collections::BTreeMap;
use std::time::Duration;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use syscon_application::{ConsoleBackend, LoginRequest, RegisterRequest};
use syscon_core::{AppError, BearerToken, Role};
use syscon_domain::CommandRequest;
use url::Url;

use super::HttpConsoleBackend;

fn token(value: &str) -> BearerToken {
    match BearerToken::new(value) {
        Ok(token) => token,
        Err(error) => panic!("invalid test token: {error}"),
    }
}

fn is_authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer T1")
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Invalid token" })),
    )
        .into_response()
}

async fn login(Json(body): Json<Value>) -> Response {
    if body["username"] == "alice" && body["password"] == "pw" {
        return Json(json!({ "token": "T1", "role": "admin" })).into_response();
    }
    if body["username"] == "mallory" {
        return Json(json!({ "token": "T9", "role": "root" })).into_response();
    }

    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "Invalid credentials" })),
    )
        .into_response()
}

async fn register(Json(body): Json<Value>) -> Response {
    if body["username"] == "taken" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Username already exists" })),
        )
            .into_response();
    }
    if body["username"] == "silent" {
        return StatusCode::BAD_REQUEST.into_response();
    }

    StatusCode::CREATED.into_response()
}

async fn syscall(Path(name): Path<String>, headers: HeaderMap, body: Json<Value>) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    match name.as_str() {
        "read" => Json(json!({ "result": body.0 })).into_response(),
        "getpid" => Json(json!({ "pid": 4242 })).into_response(),
        "delete_file" => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "Permission denied for delete_file" })),
        )
            .into_response(),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
    }
}

async fn logs(headers: HeaderMap) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    Json(json!([
        {
            "username": "alice",
            "syscall": "read",
            "timestamp": "2024-05-01T10:00:00",
            "params": { "fd": "3", "size": "1024" },
            "result": "hello"
        },
        {
            "username": "bob",
            "syscall": "delete_file",
            "timestamp": "2024-05-01T10:01:00",
            "status": "denied"
        }
    ]))
    .into_response()
}

async fn syscalls(headers: HeaderMap) -> Response {
    if !is_authorized(&headers) {
        return unauthorized();
    }

    Json(json!([{ "name": "open", "description": "Open a file" }, { "name": "getpid" }]))
        .into_response()
}

async fn slow_logs() -> Response {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!([])).into_response()
}

async fn serve(router: Router) -> Url {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind test listener: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("failed to read test listener address: {error}"),
    };

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    match Url::parse(&format!("http://{address}")) {
        Ok(url) => url,
        Err(error) => panic!("invalid test url: {error}"),
    }
}

async fn backend() -> HttpConsoleBackend {
    let router = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/syscall/{name}", post(syscall))
        .route("/logs", get(logs))
        .route("/syscalls", get(syscalls));

    HttpConsoleBackend::new(reqwest::Client::new(), serve(router).await)
}

fn command(operation: &'static str, params: &[(&str, &str)]) -> CommandRequest {
    CommandRequest {
        operation,
        params: params
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect::<BTreeMap<_, _>>(),
    }
}

#[tokio::test]
async fn login_returns_session_with_role() {
    let backend = backend().await;

    let session = backend
        .login(&LoginRequest {
            username: "alice".to_owned(),
            password: "pw".to_owned(),
        })
        .await;

    assert!(matches!(
        session,
        Ok(session) if session.token().as_str() == "T1" && session.role() == Role::Admin
    ));
}

#[tokio::test]
async fn rejected_login_is_an_application_error() {
    let backend = backend().await;

    let result = backend
        .login(&LoginRequest {
            username: "alice".to_owned(),
            password: "wrong".to_owned(),
        })
        .await;

    assert_eq!(
        result,
        Err(AppError::Application("Invalid credentials".to_owned()))
    );
}

#[tokio::test]
async fn unknown_role_in_login_response_is_rejected() {
    let backend = backend().await;

    let result = backend
        .login(&LoginRequest {
            username: "mallory".to_owned(),
            password: "pw".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn register_maps_server_error_and_fallback() {
    let backend = backend().await;
    let request = |username: &str| RegisterRequest {
        username: username.to_owned(),
        password: "pw".to_owned(),
        role: Role::User,
    };

    assert_eq!(backend.register(&request("carol")).await, Ok(()));
    assert_eq!(
        backend.register(&request("taken")).await,
        Err(AppError::Application("Username already exists".to_owned()))
    );
    assert_eq!(
        backend.register(&request("silent")).await,
        Err(AppError::Application("Registration failed".to_owned()))
    );
}

#[tokio::test]
async fn execute_sends_string_params_with_bearer() {
    let backend = backend().await;

    let result = backend
        .execute(&token("T1"), &command("read", &[("fd", "3"), ("size", "1024")]))
        .await;

    assert_eq!(result, Ok(json!({ "fd": "3", "size": "1024" })));
}

#[tokio::test]
async fn execute_without_result_key_returns_whole_body() {
    let backend = backend().await;

    let result = backend.execute(&token("T1"), &command("getpid", &[])).await;

    assert_eq!(result, Ok(json!({ "pid": 4242 })));
}

#[tokio::test]
async fn execute_maps_statuses() {
    let backend = backend().await;

    assert_eq!(
        backend.execute(&token("T1"), &command("delete_file", &[])).await,
        Err(AppError::Application(
            "Permission denied for delete_file".to_owned()
        ))
    );
    assert_eq!(
        backend.execute(&token("T1"), &command("stat", &[])).await,
        Err(AppError::Application(
            "request failed with status 500".to_owned()
        ))
    );
    assert_eq!(
        backend.execute(&token("stale"), &command("read", &[])).await,
        Err(AppError::Unauthorized("Invalid token".to_owned()))
    );
}

#[tokio::test]
async fn list_logs_keeps_server_order() {
    let backend = backend().await;

    let entries = match backend.list_logs(&token("T1")).await {
        Ok(entries) => entries,
        Err(error) => panic!("log fetch failed: {error}"),
    };

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].username, "alice");
    assert_eq!(entries[0].result, Some(json!("hello")));
    assert_eq!(entries[1].status.as_deref(), Some("denied"));
}

#[tokio::test]
async fn list_syscalls_defaults_missing_description() {
    let backend = backend().await;

    let catalog = match backend.list_syscalls(&token("T1")).await {
        Ok(catalog) => catalog,
        Err(error) => panic!("catalog fetch failed: {error}"),
    };

    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog[1].name, "getpid");
    assert!(catalog[1].description.is_empty());
}

#[tokio::test]
async fn slow_response_times_out() {
    let base_url = serve(Router::new().route("/logs", get(slow_logs))).await;
    let backend = match HttpConsoleBackend::with_timeout(base_url, Duration::from_millis(50)) {
        Ok(backend) => backend,
        Err(error) => panic!("failed to build backend: {error}"),
    };

    let result = backend.list_logs(&token("T1")).await;

    assert_eq!(result, Err(AppError::Timeout));
}

#[tokio::test]
async fn refused_connection_is_a_transport_error() {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
        Ok(listener) => listener,
        Err(error) => panic!("failed to bind test listener: {error}"),
    };
    let address = match listener.local_addr() {
        Ok(address) => address,
        Err(error) => panic!("failed to read test listener address: {error}"),
    };
    drop(listener);

    let base_url = match Url::parse(&format!("http://{address}")) {
        Ok(url) => url,
        Err(error) => panic!("invalid test url: {error}"),
    };
    let backend = HttpConsoleBackend::new(reqwest::Client::new(), base_url);

    let result = backend.list_logs(&token("T1")).await;

    assert!(matches!(result, Err(AppError::Transport(_))));
}

#[test]
fn base_url_path_is_kept_for_relative_endpoints() {
    let base_url = match Url::parse("http://127.0.0.1:5000/api?debug=1") {
        Ok(url) => url,
        Err(error) => panic!("invalid test url: {error}"),
    };

    let backend = HttpConsoleBackend::new(reqwest::Client::new(), base_url);

    assert_eq!(backend.base_url().as_str(), "http://127.0.0.1:5000/api/");
    assert!(matches!(
        backend.endpoint("syscall/read"),
        Ok(url) if url.as_str() == "http://127.0.0.1:5000/api/syscall/read"
    ));
}
