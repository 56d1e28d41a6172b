use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use syscon_application::{ConsoleBackend, LoginRequest, RegisterRequest};
use syscon_core::{AppError, AppResult, BearerToken, Role};
use syscon_domain::{CommandRequest, LogEntry, Session, SyscallSummary};
use tracing::debug;
use url::Url;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    role: String,
}

/// Backend reached over HTTP with JSON bodies and bearer authentication.
#[derive(Debug, Clone)]
pub struct HttpConsoleBackend {
    http_client: reqwest::Client,
    base_url: Url,
}

/// Whether an endpoint requires a bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Protected,
}

impl HttpConsoleBackend {
    /// Creates a backend over an existing client.
    #[must_use]
    pub fn new(http_client: reqwest::Client, base_url: Url) -> Self {
        Self {
            http_client,
            base_url: normalize_base_url(base_url),
        }
    }

    /// Creates a backend with its own client and a per-request timeout.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self::new(http_client, base_url))
    }

    /// Returns the normalized base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url.join(path).map_err(|error| {
            AppError::Internal(format!("invalid endpoint path '{path}': {error}"))
        })
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        access: Access,
        fallback: Option<&str>,
    ) -> AppResult<Value> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(status = status.as_u16(), "backend responded");

        if status.is_success() {
            if body.trim().is_empty() {
                return Ok(Value::Null);
            }
            return serde_json::from_str(&body).map_err(|error| {
                AppError::Internal(format!("malformed response body: {error}"))
            });
        }

        let message = server_error_message(&body).unwrap_or_else(|| match fallback {
            Some(fallback) => fallback.to_owned(),
            None => format!("request failed with status {}", status.as_u16()),
        });
        if access == Access::Protected && status == StatusCode::UNAUTHORIZED {
            return Err(AppError::Unauthorized(message));
        }

        Err(AppError::Application(message))
    }

    async fn get_protected<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &BearerToken,
        fallback: &str,
    ) -> AppResult<T> {
        let request = self
            .http_client
            .get(self.endpoint(path)?)
            .header(header::AUTHORIZATION, format!("Bearer {}", token.as_str()));
        let value = self.send(request, Access::Protected, Some(fallback)).await?;

        serde_json::from_value(value)
            .map_err(|error| AppError::Internal(format!("malformed {path} response: {error}")))
    }
}

#[async_trait]
impl ConsoleBackend for HttpConsoleBackend {
    async fn register(&self, request: &RegisterRequest) -> AppResult<()> {
        let builder = self.http_client.post(self.endpoint("register")?).json(request);
        self.send(builder, Access::Public, Some("Registration failed"))
            .await
            .map(|_| ())
    }

    async fn login(&self, request: &LoginRequest) -> AppResult<Session> {
        let builder = self.http_client.post(self.endpoint("login")?).json(request);
        let value = self.send(builder, Access::Public, Some("Login failed")).await?;

        let response = serde_json::from_value::<LoginResponse>(value)
            .map_err(|error| AppError::Internal(format!("malformed login response: {error}")))?;
        let token = BearerToken::new(response.token)?;
        let role = Role::from_str(response.role.as_str())?;

        Ok(Session::new(token, role))
    }

    async fn execute(&self, token: &BearerToken, request: &CommandRequest) -> AppResult<Value> {
        let path = format!("syscall/{}", request.operation);
        let builder = self
            .http_client
            .post(self.endpoint(&path)?)
            .header(header::AUTHORIZATION, format!("Bearer {}", token.as_str()))
            .json(&request.body());

        let mut value = self.send(builder, Access::Protected, None).await?;

        match value.as_object_mut().and_then(|body| body.remove("result")) {
            Some(result) => Ok(result),
            None => Ok(value),
        }
    }

    async fn list_logs(&self, token: &BearerToken) -> AppResult<Vec<LogEntry>> {
        self.get_protected("logs", token, "Failed to fetch logs").await
    }

    async fn list_syscalls(&self, token: &BearerToken) -> AppResult<Vec<SyscallSummary>> {
        self.get_protected("syscalls", token, "Failed to fetch syscalls")
            .await
    }
}

fn normalize_base_url(mut base_url: Url) -> Url {
    if !base_url.path().ends_with('/') {
        let path = format!("{}/", base_url.path());
        base_url.set_path(&path);
    }
    base_url.set_query(None);
    base_url.set_fragment(None);
    base_url
}

fn transport_error(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        return AppError::Timeout;
    }
    AppError::Transport(error.to_string())
}

fn server_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests;
