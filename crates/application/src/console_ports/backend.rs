use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use syscon_core::{AppResult, BearerToken, Role};
use syscon_domain::{CommandRequest, LogEntry, Session, SyscallSummary};

/// Payload for account registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    /// Requested username.
    pub username: String,
    /// Plaintext password, sent once over the wire.
    pub password: String,
    /// Requested role.
    pub role: Role,
}

/// Payload for password login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// Plaintext password.
    pub password: String,
}

/// Port for the syscall backend behind the network boundary.
///
/// Implementations map a response without a status to
/// `AppError::Transport` or `AppError::Timeout`, a rejected token on a
/// protected endpoint to `AppError::Unauthorized`, and every other
/// non-success status to `AppError::Application` carrying the server message.
#[async_trait]
pub trait ConsoleBackend: Send + Sync {
    /// Registers a new account. Public endpoint.
    async fn register(&self, request: &RegisterRequest) -> AppResult<()>;

    /// Exchanges credentials for a session. Public endpoint.
    async fn login(&self, request: &LoginRequest) -> AppResult<Session>;

    /// Runs one simulated syscall and returns its result payload.
    async fn execute(&self, token: &BearerToken, request: &CommandRequest) -> AppResult<Value>;

    /// Lists the audit log in server order.
    async fn list_logs(&self, token: &BearerToken) -> AppResult<Vec<LogEntry>>;

    /// Lists the syscall catalog.
    async fn list_syscalls(&self, token: &BearerToken) -> AppResult<Vec<SyscallSummary>>;
}
