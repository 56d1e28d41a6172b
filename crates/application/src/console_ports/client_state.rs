use async_trait::async_trait;
use syscon_core::AppResult;
use syscon_domain::{Session, Theme};

/// Port for durable client-side state that survives restarts.
///
/// The session and the theme are stored independently: clearing one never
/// touches the other.
#[async_trait]
pub trait ClientStateStore: Send + Sync {
    /// Loads the persisted session, if a complete one exists.
    async fn load_session(&self) -> AppResult<Option<Session>>;

    /// Persists token and role together.
    async fn save_session(&self, session: &Session) -> AppResult<()>;

    /// Removes the persisted session. Succeeds when nothing is stored.
    async fn clear_session(&self) -> AppResult<()>;

    /// Loads the persisted theme preference.
    async fn load_theme(&self) -> AppResult<Option<Theme>>;

    /// Persists the theme preference.
    async fn save_theme(&self, theme: Theme) -> AppResult<()>;

    /// Removes the persisted theme preference.
    async fn clear_theme(&self) -> AppResult<()>;
}
