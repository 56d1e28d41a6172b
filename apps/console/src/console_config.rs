use std::env;
use std::path::PathBuf;
use std::time::Duration;

use syscon_core::{AppError, AppResult};
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

/// Where client state is kept between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateBackend {
    File,
    Memory,
}

impl StateBackend {
    fn parse(value: &str) -> AppResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(AppError::Validation(format!(
                "CONSOLE_STATE_BACKEND must be 'file' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub api_base_url: Url,
    pub state_backend: StateBackend,
    pub state_path: PathBuf,
    pub request_timeout: Duration,
}

impl ConsoleConfig {
    pub fn load() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let raw_base_url =
            non_empty("CONSOLE_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        let api_base_url = Url::parse(&raw_base_url).map_err(|error| {
            AppError::Validation(format!(
                "invalid CONSOLE_API_BASE_URL '{raw_base_url}': {error}"
            ))
        })?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(AppError::Validation(format!(
                "CONSOLE_API_BASE_URL must use http or https, got '{}'",
                api_base_url.scheme()
            )));
        }

        let state_backend = non_empty("CONSOLE_STATE_BACKEND")
            .map(|value| StateBackend::parse(&value))
            .transpose()?
            .unwrap_or(StateBackend::File);

        let state_path = non_empty("CONSOLE_STATE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                non_empty("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_default()
                    .join(".syscon")
                    .join("state.json")
            });

        let request_timeout_ms = match non_empty("CONSOLE_REQUEST_TIMEOUT_MS") {
            Some(value) => value.parse::<u64>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid CONSOLE_REQUEST_TIMEOUT_MS value '{value}': {error}"
                ))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_MS,
        };
        if request_timeout_ms == 0 {
            return Err(AppError::Validation(
                "CONSOLE_REQUEST_TIMEOUT_MS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_base_url,
            state_backend,
            state_path,
            request_timeout: Duration::from_millis(request_timeout_ms),
        })
    }
}

/// Logs go to stderr so they never interleave with console output.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
