//! Shared primitives for all Rust crates in the syscall console.

#![forbid(unsafe_code)]

/// Authentication primitives shared across crates.
pub mod auth;

use thiserror::Error;

pub use auth::{BearerToken, Role};

/// Result type used across syscall console crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input caught before anything is sent.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or rejected bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated, but the role does not allow the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The backend answered with a non-success status and an error message.
    #[error("{0}")]
    Application(String),

    /// No response was obtained from the backend.
    #[error("connection error: {0}")]
    Transport(String),

    /// The request exceeded the configured timeout.
    #[error("connection error: request timed out")]
    Timeout,

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// User-facing failure classes shown by the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Rejected locally before sending.
    Validation,
    /// Absent or rejected credentials, or role gating.
    Authentication,
    /// The server reported an error.
    Application,
    /// No response obtained.
    Transport,
    /// Local failure unrelated to user input.
    Internal,
}

impl ErrorClass {
    /// Returns a stable label for this class.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Authentication => "authentication",
            Self::Application => "application",
            Self::Transport => "transport",
            Self::Internal => "internal",
        }
    }
}

impl AppError {
    /// Returns the failure class of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::Unauthorized(_) | Self::Forbidden(_) => ErrorClass::Authentication,
            Self::Application(_) => ErrorClass::Application,
            Self::Transport(_) | Self::Timeout => ErrorClass::Transport,
            Self::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Returns the message rendered in a response region.
    ///
    /// Server-reported messages are returned verbatim.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Unauthorized(message) if message.is_empty() => "please log in".to_owned(),
            Self::Unauthorized(message) => format!("please log in ({message})"),
            Self::Forbidden(message) => format!("permission denied: {message}"),
            Self::Application(message) => message.clone(),
            Self::Transport(_) | Self::Timeout => self.to_string(),
            Self::Internal(message) => format!("internal error: {message}"),
        }
    }
}
