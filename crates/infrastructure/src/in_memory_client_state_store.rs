use async_trait::async_trait;
use syscon_application::ClientStateStore;
use syscon_core::AppResult;
use syscon_domain::{Session, Theme};
use tokio::sync::RwLock;

/// Client state kept for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct InMemoryClientStateStore {
    session: RwLock<Option<Session>>,
    theme: RwLock<Option<Theme>>,
}

impl InMemoryClientStateStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClientStateStore for InMemoryClientStateStore {
    async fn load_session(&self) -> AppResult<Option<Session>> {
        Ok(self.session.read().await.clone())
    }

    async fn save_session(&self, session: &Session) -> AppResult<()> {
        *self.session.write().await = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&self) -> AppResult<()> {
        *self.session.write().await = None;
        Ok(())
    }

    async fn load_theme(&self) -> AppResult<Option<Theme>> {
        Ok(*self.theme.read().await)
    }

    async fn save_theme(&self, theme: Theme) -> AppResult<()> {
        *self.theme.write().await = Some(theme);
        Ok(())
    }

    async fn clear_theme(&self) -> AppResult<()> {
        *self.theme.write().await = None;
        Ok(())
    }
}
