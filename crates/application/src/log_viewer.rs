//! Audit log viewer: fetched baseline plus client-side filtering.

use std::sync::Arc;

use syscon_core::{AppError, AppResult};
use syscon_domain::{LogEntry, LogFilter};
use tracing::{debug, warn};

use crate::{ConsoleBackend, SessionStore};

/// Fetches the audit log with the current bearer token.
#[derive(Clone)]
pub struct AuditLogService {
    backend: Arc<dyn ConsoleBackend>,
    session: Arc<SessionStore>,
}

impl AuditLogService {
    /// Creates the service over the backend and the session context.
    #[must_use]
    pub fn new(backend: Arc<dyn ConsoleBackend>, session: Arc<SessionStore>) -> Self {
        Self { backend, session }
    }

    /// Fetches the full log collection in server order.
    pub async fn fetch_logs(&self) -> AppResult<Vec<LogEntry>> {
        let token = self.session.bearer_token()?;
        self.backend.list_logs(&token).await
    }
}

/// Identifies one refresh so late completions can be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    /// Returns the sequence number.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What the log panel currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LogDisplay {
    /// Nothing fetched in this session.
    #[default]
    Cleared,
    /// Entries passing the filter, in baseline order.
    Entries(Vec<LogEntry>),
    /// Baseline empty or nothing matched.
    NoEntries,
    /// Last refresh failed; no stale rows are kept.
    Failed(String),
}

/// Log panel state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogViewer {
    baseline: Option<Vec<LogEntry>>,
    filter: LogFilter,
    display: LogDisplay,
    latest_ticket: u64,
}

impl LogViewer {
    /// Issues a ticket for a new refresh. Older tickets become stale.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.latest_ticket = self.latest_ticket.saturating_add(1);
        RefreshTicket(self.latest_ticket)
    }

    /// Applies a refresh result. Returns `false` when the ticket was stale.
    ///
    /// Failures fail closed: the baseline and the displayed rows are dropped.
    pub fn complete_refresh(
        &mut self,
        ticket: RefreshTicket,
        result: AppResult<Vec<LogEntry>>,
    ) -> bool {
        if ticket.0 != self.latest_ticket {
            debug!(
                ticket = ticket.0,
                latest = self.latest_ticket,
                "discarding stale log refresh"
            );
            return false;
        }

        match result {
            Ok(entries) => {
                self.baseline = Some(entries);
                self.recompute();
            }
            Err(error) => {
                warn!(class = error.class().as_str(), error = %error, "log refresh failed");
                self.fail_closed(&error);
            }
        }

        true
    }

    /// Fetches and applies a fresh baseline.
    pub async fn refresh(&mut self, service: &AuditLogService) -> bool {
        let ticket = self.begin_refresh();
        let result = service.fetch_logs().await;
        self.complete_refresh(ticket, result)
    }

    /// Recomputes the displayed rows from the baseline. Never fetches.
    pub fn apply_filter(&mut self, username_substring: &str, syscall_substring: &str) {
        self.filter = LogFilter::new(username_substring, syscall_substring);
        self.recompute();
    }

    /// Drops baseline, filter and display, and invalidates in-flight refreshes.
    pub fn clear(&mut self) {
        self.latest_ticket = self.latest_ticket.saturating_add(1);
        self.baseline = None;
        self.filter = LogFilter::default();
        self.display = LogDisplay::Cleared;
    }

    /// Returns the displayed rows.
    #[must_use]
    pub fn display(&self) -> &LogDisplay {
        &self.display
    }

    /// Returns the last successfully fetched rows.
    #[must_use]
    pub fn baseline(&self) -> Option<&[LogEntry]> {
        self.baseline.as_deref()
    }

    /// Returns the active filter.
    #[must_use]
    pub fn filter(&self) -> &LogFilter {
        &self.filter
    }

    fn fail_closed(&mut self, error: &AppError) {
        self.baseline = None;
        self.display = LogDisplay::Failed(error.user_message());
    }

    fn recompute(&mut self) {
        let Some(baseline) = self.baseline.as_deref() else {
            return;
        };

        let visible = self.filter.apply(baseline);
        self.display = if visible.is_empty() {
            LogDisplay::NoEntries
        } else {
            LogDisplay::Entries(visible)
        };
    }
}
