use serde::{Deserialize, Serialize};
use syscon_core::{BearerToken, Role};

/// Authenticated session. Token and role only ever exist together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: BearerToken,
    role: Role,
}

impl Session {
    /// Creates a session from a login response.
    #[must_use]
    pub fn new(token: BearerToken, role: Role) -> Self {
        Self { token, role }
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Returns the session role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Snapshot of the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CurrentSession {
    /// A token and role are present.
    Authenticated(Session),
    /// Neither token nor role is present.
    Unauthenticated,
}

impl CurrentSession {
    /// Returns the session when authenticated.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match self {
            Self::Authenticated(session) => Some(session),
            Self::Unauthenticated => None,
        }
    }

    /// Returns whether a session is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl From<Option<Session>> for CurrentSession {
    fn from(value: Option<Session>) -> Self {
        value.map_or(Self::Unauthenticated, Self::Authenticated)
    }
}
