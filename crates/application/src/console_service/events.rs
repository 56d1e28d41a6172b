use std::collections::BTreeMap;

use serde_json::Value;
use syscon_core::{AppError, AppResult, Role};
use syscon_domain::{CurrentSession, LogEntry, Session, SyscallSummary, Theme};

use super::state::CommandEpoch;
use crate::{LoginRequest, RefreshTicket, RegisterRequest};

/// User actions and effect completions.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// Persisted client state was loaded at startup.
    Started {
        /// Restored session.
        session: CurrentSession,
        /// Restored theme.
        theme: Theme,
    },
    /// Navigate to the registration form.
    ShowRegister,
    /// Navigate to the login form.
    ShowLogin,
    /// Submit the login form.
    SubmitLogin {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },
    /// Login request finished.
    LoginCompleted {
        /// Username that was submitted.
        username: String,
        /// Session granted by the backend.
        result: AppResult<Session>,
    },
    /// Submit the registration form.
    SubmitRegister {
        /// Username.
        username: String,
        /// Password.
        password: String,
        /// Requested role.
        role: Role,
    },
    /// Registration request finished.
    RegisterCompleted {
        /// Backend outcome.
        result: AppResult<()>,
    },
    /// Drop the session and return to the login form.
    Logout,
    /// Select an operation in the command form.
    SelectOperation {
        /// Operation name.
        name: String,
    },
    /// Type a value into a form field.
    SetField {
        /// Field id.
        field_id: String,
        /// Raw value.
        value: String,
    },
    /// Submit the command form.
    SubmitCommand,
    /// Command request finished.
    CommandCompleted {
        /// Operation that was sent.
        operation: String,
        /// Epoch the command was submitted in.
        epoch: CommandEpoch,
        /// Result payload.
        result: AppResult<Value>,
    },
    /// Re-fetch the audit log.
    RefreshLogs,
    /// Audit log fetch finished.
    LogsFetched {
        /// Ticket issued when the fetch started.
        ticket: RefreshTicket,
        /// Fetched entries.
        result: AppResult<Vec<LogEntry>>,
    },
    /// Change the log filter.
    FilterLogs {
        /// Username substring.
        username: String,
        /// Syscall substring.
        syscall: String,
    },
    /// Catalog fetch finished.
    CatalogLoaded {
        /// Catalog rows.
        result: AppResult<Vec<SyscallSummary>>,
    },
    /// Switch between light and dark.
    ToggleTheme,
    /// Forget the stored theme and use the default.
    ResetTheme,
    /// A local storage effect failed.
    StorageFailed(AppError),
}

/// Side effects requested by the handler.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEffect {
    /// Call the registration endpoint.
    Register(RegisterRequest),
    /// Call the login endpoint.
    Login(LoginRequest),
    /// Store a session in the session store.
    SetSession(Session),
    /// Clear the session store.
    ClearSession,
    /// Send a command through the dispatcher.
    ExecuteCommand {
        /// Operation name.
        operation: String,
        /// Form values at submission time.
        values: BTreeMap<String, String>,
        /// Epoch at submission time.
        epoch: CommandEpoch,
    },
    /// Fetch the audit log.
    FetchLogs(RefreshTicket),
    /// Fetch the syscall catalog.
    LoadCatalog,
    /// Persist the theme.
    PersistTheme(Theme),
    /// Remove the persisted theme.
    ClearTheme,
}

impl ConsoleEffect {
    /// Returns stable effect name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register(_) => "register",
            Self::Login(_) => "login",
            Self::SetSession(_) => "set_session",
            Self::ClearSession => "clear_session",
            Self::ExecuteCommand { .. } => "execute_command",
            Self::FetchLogs(_) => "fetch_logs",
            Self::LoadCatalog => "load_catalog",
            Self::PersistTheme(_) => "persist_theme",
            Self::ClearTheme => "clear_theme",
        }
    }

    /// Returns whether the effect only touches client storage.
    ///
    /// Local effects run in order before any network effect of the same event.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::SetSession(_) | Self::ClearSession | Self::PersistTheme(_) | Self::ClearTheme
        )
    }
}
