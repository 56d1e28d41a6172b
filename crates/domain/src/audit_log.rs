use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One audited syscall invocation as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Invoking user.
    pub username: String,
    /// Syscall name.
    pub syscall: String,
    /// Server timestamp, usually ISO-8601.
    pub timestamp: String,
    /// Invocation parameters, opaque to the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    /// Result payload, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Status label, when the backend reports one instead of a result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl LogEntry {
    /// Returns the result or status text for display.
    #[must_use]
    pub fn outcome_text(&self) -> String {
        match (&self.result, &self.status) {
            (Some(Value::String(result)), _) => result.clone(),
            (Some(result), _) => result.to_string(),
            (None, Some(status)) => status.clone(),
            (None, None) => "-".to_owned(),
        }
    }

    /// Returns the params as compact JSON, or `-`.
    #[must_use]
    pub fn params_text(&self) -> String {
        self.params
            .as_ref()
            .map_or_else(|| "-".to_owned(), Value::to_string)
    }

    /// Formats the timestamp for display, falling back to the raw value.
    #[must_use]
    pub fn display_timestamp(&self) -> String {
        let raw = self.timestamp.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return parsed.format("%Y-%m-%d %H:%M:%S %:z").to_string();
        }

        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|parsed| parsed.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|_| raw.to_owned())
    }
}

/// Case-insensitive substring filter over username and syscall.
///
/// Empty values match everything; both non-empty values must match. Needles
/// are lowercased but kept otherwise verbatim, spaces included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    username: String,
    syscall: String,
}

impl LogFilter {
    /// Creates a filter from raw input values.
    #[must_use]
    pub fn new(username: &str, syscall: &str) -> Self {
        Self {
            username: username.to_lowercase(),
            syscall: syscall.to_lowercase(),
        }
    }

    /// Returns the normalized username needle.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the normalized syscall needle.
    #[must_use]
    pub fn syscall(&self) -> &str {
        self.syscall.as_str()
    }

    /// Returns whether the filter matches everything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.syscall.is_empty()
    }

    /// Returns whether one entry passes the filter.
    #[must_use]
    pub fn matches(&self, entry: &LogEntry) -> bool {
        contains_folded(entry.username.as_str(), self.username.as_str())
            && contains_folded(entry.syscall.as_str(), self.syscall.as_str())
    }

    /// Returns the matching subset in baseline order.
    #[must_use]
    pub fn apply(&self, entries: &[LogEntry]) -> Vec<LogEntry> {
        entries
            .iter()
            .filter(|entry| self.matches(entry))
            .cloned()
            .collect()
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(needle)
}
