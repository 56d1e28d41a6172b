use async_trait::async_trait;
use serde_json::Value;
use syscon_core::{AppError, AppResult, BearerToken, Role};
use syscon_domain::{CommandRequest, LogEntry, Session, SyscallSummary, Theme};
use tokio::sync::Mutex;

use crate::{ClientStateStore, ConsoleBackend, LoginRequest, RegisterRequest};

#[derive(Default)]
pub(crate) struct FakeClientStateStore {
    pub(crate) session: Mutex<Option<Session>>,
    pub(crate) theme: Mutex<Option<Theme>>,
    pub(crate) session_clears: Mutex<usize>,
    pub(crate) fail_writes: Mutex<bool>,
}

impl FakeClientStateStore {
    async fn check_writable(&self) -> AppResult<()> {
        if *self.fail_writes.lock().await {
            return Err(AppError::Internal("disk full".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl ClientStateStore for FakeClientStateStore {
    async fn load_session(&self) -> AppResult<Option<Session>> {
        Ok(self.session.lock().await.clone())
    }

    async fn save_session(&self, session: &Session) -> AppResult<()> {
        self.check_writable().await?;
        *self.session.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> AppResult<()> {
        *self.session_clears.lock().await += 1;
        self.check_writable().await?;
        *self.session.lock().await = None;
        Ok(())
    }

    async fn load_theme(&self) -> AppResult<Option<Theme>> {
        Ok(*self.theme.lock().await)
    }

    async fn save_theme(&self, theme: Theme) -> AppResult<()> {
        self.check_writable().await?;
        *self.theme.lock().await = Some(theme);
        Ok(())
    }

    async fn clear_theme(&self) -> AppResult<()> {
        self.check_writable().await?;
        *self.theme.lock().await = None;
        Ok(())
    }
}

pub(crate) struct FakeBackend {
    pub(crate) login_result: Mutex<AppResult<Session>>,
    pub(crate) register_result: Mutex<AppResult<()>>,
    pub(crate) execute_result: Mutex<AppResult<Value>>,
    pub(crate) logs_result: Mutex<AppResult<Vec<LogEntry>>>,
    pub(crate) catalog_result: Mutex<AppResult<Vec<SyscallSummary>>>,
    pub(crate) logins: Mutex<Vec<LoginRequest>>,
    pub(crate) registrations: Mutex<Vec<RegisterRequest>>,
    pub(crate) executed: Mutex<Vec<(String, CommandRequest)>>,
    pub(crate) log_fetches: Mutex<Vec<String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            login_result: Mutex::new(Err(AppError::Application(
                "Invalid credentials".to_owned(),
            ))),
            register_result: Mutex::new(Ok(())),
            execute_result: Mutex::new(Ok(Value::Null)),
            logs_result: Mutex::new(Ok(Vec::new())),
            catalog_result: Mutex::new(Ok(Vec::new())),
            logins: Mutex::new(Vec::new()),
            registrations: Mutex::new(Vec::new()),
            executed: Mutex::new(Vec::new()),
            log_fetches: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ConsoleBackend for FakeBackend {
    async fn register(&self, request: &RegisterRequest) -> AppResult<()> {
        self.registrations.lock().await.push(request.clone());
        self.register_result.lock().await.clone()
    }

    async fn login(&self, request: &LoginRequest) -> AppResult<Session> {
        self.logins.lock().await.push(request.clone());
        self.login_result.lock().await.clone()
    }

    async fn execute(&self, token: &BearerToken, request: &CommandRequest) -> AppResult<Value> {
        self.executed
            .lock()
            .await
            .push((token.as_str().to_owned(), request.clone()));
        self.execute_result.lock().await.clone()
    }

    async fn list_logs(&self, token: &BearerToken) -> AppResult<Vec<LogEntry>> {
        self.log_fetches.lock().await.push(token.as_str().to_owned());
        self.logs_result.lock().await.clone()
    }

    async fn list_syscalls(&self, _token: &BearerToken) -> AppResult<Vec<SyscallSummary>> {
        self.catalog_result.lock().await.clone()
    }
}

pub(crate) fn token(value: &str) -> BearerToken {
    match BearerToken::new(value) {
        Ok(token) => token,
        Err(error) => panic!("invalid test token: {error}"),
    }
}

pub(crate) fn session(value: &str, role: Role) -> Session {
    Session::new(token(value), role)
}

pub(crate) fn log_entry(username: &str, syscall: &str) -> LogEntry {
    LogEntry {
        username: username.to_owned(),
        syscall: syscall.to_owned(),
        timestamp: "2024-05-01T10:00:00".to_owned(),
        params: None,
        result: None,
        status: Some("success".to_owned()),
    }
}
