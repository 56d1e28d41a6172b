//! Panel routing for the console.

use syscon_core::Role;
use syscon_domain::{OperationDescriptor, operations_for_role};

/// Mutually exclusive console panels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ViewState {
    /// Login form.
    #[default]
    AnonymousLogin,
    /// Registration form.
    AnonymousRegister,
    /// Command console and audit log.
    Authenticated {
        /// Role of the active session.
        role: Role,
        /// Username typed at login; unknown for a restored session.
        username: Option<String>,
    },
}

impl ViewState {
    /// Returns stable panel name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnonymousLogin => "login",
            Self::AnonymousRegister => "register",
            Self::Authenticated { .. } => "console",
        }
    }

    /// Returns the session role when authenticated.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Authenticated { role, .. } => Some(*role),
            Self::AnonymousLogin | Self::AnonymousRegister => None,
        }
    }

    /// Returns whether the console panel is shown.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// Returns the operations whose controls are visible.
    #[must_use]
    pub fn visible_operations(&self) -> Vec<&'static OperationDescriptor> {
        self.role().map(operations_for_role).unwrap_or_default()
    }
}

/// Navigation inputs of the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// User asked for the registration form.
    ShowRegister,
    /// User asked for the login form.
    ShowLogin,
    /// Backend accepted a login, or a persisted session was restored.
    LoginSucceeded {
        /// Granted role.
        role: Role,
        /// Username, when known.
        username: Option<String>,
    },
    /// User logged out.
    Logout,
}

/// Work the console performs when a panel is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterHook {
    /// Reset the command form to an empty selection.
    ResetForm,
    /// Fetch the audit log.
    RefreshLogs,
    /// Fetch the syscall catalog.
    LoadCatalog,
    /// Drop command form, responses, log output and catalog.
    ClearConsole,
}

/// Outcome of routing one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteChange {
    /// Panel after the action.
    pub next: ViewState,
    /// Hooks to run for the entered panel; empty when nothing changed.
    pub hooks: Vec<EnterHook>,
}

impl RouteChange {
    fn stay(current: &ViewState) -> Self {
        Self {
            next: current.clone(),
            hooks: Vec::new(),
        }
    }

    /// Returns whether the action moved to another panel.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.hooks.is_empty()
    }
}

/// Applies one navigation action. Actions invalid for the current panel are no-ops.
#[must_use]
pub fn route(current: &ViewState, action: ViewAction) -> RouteChange {
    match (current, action) {
        (ViewState::AnonymousLogin, ViewAction::ShowRegister) => RouteChange {
            next: ViewState::AnonymousRegister,
            hooks: vec![EnterHook::ClearConsole],
        },
        (ViewState::AnonymousRegister, ViewAction::ShowLogin) => RouteChange {
            next: ViewState::AnonymousLogin,
            hooks: vec![EnterHook::ClearConsole],
        },
        (ViewState::AnonymousLogin, ViewAction::LoginSucceeded { role, username }) => RouteChange {
            next: ViewState::Authenticated { role, username },
            hooks: vec![
                EnterHook::ResetForm,
                EnterHook::RefreshLogs,
                EnterHook::LoadCatalog,
            ],
        },
        (ViewState::Authenticated { .. }, ViewAction::Logout) => RouteChange {
            next: ViewState::AnonymousLogin,
            hooks: vec![EnterHook::ClearConsole],
        },
        (current, _) => RouteChange::stay(current),
    }
}
