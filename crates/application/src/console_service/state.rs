use syscon_domain::{SyscallSummary, Theme};

use crate::{CommandForm, LogViewer, ViewState};

/// Visual state of a response message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseTone {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
}

/// Message rendered in a response region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMessage {
    /// Success or error styling.
    pub tone: ResponseTone,
    /// Rendered text.
    pub text: String,
}

/// Single response region of one form. Every update overwrites the last one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseRegion {
    message: Option<ResponseMessage>,
}

impl ResponseRegion {
    /// Shows a success message.
    pub fn succeed(&mut self, text: impl Into<String>) {
        self.message = Some(ResponseMessage {
            tone: ResponseTone::Success,
            text: text.into(),
        });
    }

    /// Shows an error message.
    pub fn fail(&mut self, text: impl Into<String>) {
        self.message = Some(ResponseMessage {
            tone: ResponseTone::Error,
            text: text.into(),
        });
    }

    /// Empties the region.
    pub fn clear(&mut self) {
        self.message = None;
    }

    /// Returns the current message.
    #[must_use]
    pub fn message(&self) -> Option<&ResponseMessage> {
        self.message.as_ref()
    }

    /// Returns the current text, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.message.as_ref().map(|message| message.text.as_str())
    }
}

/// Console session a command was submitted in.
///
/// Logging out starts a new epoch, so completions of commands sent by the
/// previous user are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CommandEpoch(u64);

impl CommandEpoch {
    /// Returns the epoch number.
    #[must_use]
    pub fn sequence(&self) -> u64 {
        self.0
    }

    pub(super) fn advanced(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Everything the console renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsoleState {
    /// Active panel.
    pub view: ViewState,
    /// Response region of the login form.
    pub login_response: ResponseRegion,
    /// Response region of the registration form.
    pub register_response: ResponseRegion,
    /// Command form of the console panel.
    pub form: CommandForm,
    /// Response region of the command form.
    pub command_response: ResponseRegion,
    /// Epoch stamped on command submissions.
    pub command_epoch: CommandEpoch,
    /// Audit log panel.
    pub logs: LogViewer,
    /// Active theme.
    pub theme: Theme,
    /// Syscall catalog loaded on login.
    pub catalog: Vec<SyscallSummary>,
}

impl ConsoleState {
    /// Returns the response region of the visible form.
    pub fn visible_response_mut(&mut self) -> &mut ResponseRegion {
        match self.view {
            ViewState::AnonymousLogin => &mut self.login_response,
            ViewState::AnonymousRegister => &mut self.register_response,
            ViewState::Authenticated { .. } => &mut self.command_response,
        }
    }
}
