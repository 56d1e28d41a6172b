//! Session store: the single source of truth for "is a user logged in".
//!
//! The in-memory copy always follows the latest login or logout. A failed
//! persist is reported to the caller but never leaves memory behind the view.

use std::sync::{Arc, PoisonError, RwLock};

use syscon_core::{AppError, AppResult, BearerToken, Role};
use syscon_domain::{CurrentSession, Session};
use tracing::{debug, warn};

use crate::ClientStateStore;

/// Injectable session context shared by the dispatcher and the log viewer.
pub struct SessionStore {
    storage: Arc<dyn ClientStateStore>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Creates an unauthenticated store over durable client storage.
    #[must_use]
    pub fn new(storage: Arc<dyn ClientStateStore>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
        }
    }

    /// Loads the persisted session into memory.
    ///
    /// Incomplete records are reported as absent by the storage port; they are
    /// scrubbed here so token and role never reappear separately.
    pub async fn restore(&self) -> AppResult<CurrentSession> {
        match self.storage.load_session().await? {
            Some(session) => {
                debug!(role = session.role().as_str(), "restored persisted session");
                *self.current.write().unwrap_or_else(PoisonError::into_inner) =
                    Some(session.clone());
                Ok(CurrentSession::Authenticated(session))
            }
            None => {
                self.storage.clear_session().await?;
                *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;
                Ok(CurrentSession::Unauthenticated)
            }
        }
    }

    /// Stores token and role together and persists them.
    pub async fn set_session(&self, token: BearerToken, role: Role) -> AppResult<()> {
        self.store(Session::new(token, role)).await
    }

    /// Stores an already assembled session.
    ///
    /// The in-memory session is replaced even when the durable store fails.
    pub async fn store(&self, session: Session) -> AppResult<()> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());

        if let Err(error) = self.storage.save_session(&session).await {
            warn!(error = %error, "failed to persist session");
            return Err(error);
        }

        Ok(())
    }

    /// Removes token and role. Succeeds when already absent.
    ///
    /// The in-memory session is dropped even when the durable store fails.
    pub async fn clear_session(&self) -> AppResult<()> {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = None;

        if let Err(error) = self.storage.clear_session().await {
            warn!(error = %error, "failed to clear persisted session");
            return Err(error);
        }

        Ok(())
    }

    /// Returns the current session or the unauthenticated marker.
    #[must_use]
    pub fn current_session(&self) -> CurrentSession {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .into()
    }

    /// Returns the bearer token for a protected endpoint.
    pub fn bearer_token(&self) -> AppResult<BearerToken> {
        self.current_session()
            .session()
            .map(|session| session.token().clone())
            .ok_or_else(|| AppError::Unauthorized(String::new()))
    }
}
