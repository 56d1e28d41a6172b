use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use syscon_application::ClientStateStore;
use syscon_core::{AppError, AppResult, BearerToken, Role};
use syscon_domain::{Session, Theme};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// On-disk layout. Token and role are stored side by side but read as a pair.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<String>,
}

/// Client state persisted as one JSON document on disk.
#[derive(Debug)]
pub struct FileClientStateStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileClientStateStore {
    /// Creates a store backed by the given file. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the document path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_document(&self) -> AppResult<StateDocument> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                return Ok(StateDocument::default());
            }
            Err(error) => {
                return Err(AppError::Internal(format!(
                    "failed to read client state '{}': {error}",
                    self.path.display()
                )));
            }
        };

        match serde_json::from_str(&contents) {
            Ok(document) => Ok(document),
            Err(error) => {
                warn!(
                    path = %self.path.display(),
                    error = %error,
                    "ignoring unreadable client state document"
                );
                Ok(StateDocument::default())
            }
        }
    }

    async fn write_document(&self, document: &StateDocument) -> AppResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                AppError::Internal(format!(
                    "failed to create client state directory '{}': {error}",
                    parent.display()
                ))
            })?;
        }

        let payload = serde_json::to_vec_pretty(document).map_err(|error| {
            AppError::Internal(format!("failed to encode client state: {error}"))
        })?;

        let tmp_path = self.path.with_extension("tmp");
        tokio::fs::write(&tmp_path, payload).await.map_err(|error| {
            AppError::Internal(format!(
                "failed to write client state '{}': {error}",
                tmp_path.display()
            ))
        })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to replace client state '{}': {error}",
                    self.path.display()
                ))
            })?;

        debug!(path = %self.path.display(), "client state written");
        Ok(())
    }

    async fn update<F>(&self, change: F) -> AppResult<()>
    where
        F: FnOnce(&mut StateDocument) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        change(&mut document);
        self.write_document(&document).await
    }
}

#[async_trait]
impl ClientStateStore for FileClientStateStore {
    async fn load_session(&self) -> AppResult<Option<Session>> {
        let document = self.read_document().await?;

        let (token, role) = match (document.token, document.role) {
            (Some(token), Some(role)) => (token, role),
            (None, None) => return Ok(None),
            _ => {
                warn!(
                    path = %self.path.display(),
                    "discarding incomplete persisted session"
                );
                return Ok(None);
            }
        };

        match (BearerToken::new(token), Role::from_str(&role)) {
            (Ok(token), Ok(role)) => Ok(Some(Session::new(token, role))),
            (Err(error), _) | (_, Err(error)) => {
                warn!(error = %error, "discarding invalid persisted session");
                Ok(None)
            }
        }
    }

    async fn save_session(&self, session: &Session) -> AppResult<()> {
        let token = session.token().as_str().to_owned();
        let role = session.role().as_str().to_owned();
        self.update(move |document| {
            document.token = Some(token);
            document.role = Some(role);
        })
        .await
    }

    async fn clear_session(&self) -> AppResult<()> {
        self.update(|document| {
            document.token = None;
            document.role = None;
        })
        .await
    }

    async fn load_theme(&self) -> AppResult<Option<Theme>> {
        let document = self.read_document().await?;
        let Some(theme) = document.theme else {
            return Ok(None);
        };

        match Theme::from_str(&theme) {
            Ok(theme) => Ok(Some(theme)),
            Err(error) => {
                warn!(error = %error, "ignoring unknown persisted theme");
                Ok(None)
            }
        }
    }

    async fn save_theme(&self, theme: Theme) -> AppResult<()> {
        self.update(move |document| document.theme = Some(theme.as_str().to_owned()))
            .await
    }

    async fn clear_theme(&self) -> AppResult<()> {
        self.update(|document| document.theme = None).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use syscon_application::ClientStateStore;
    use syscon_core::{BearerToken, Role};
    use syscon_domain::{Session, Theme};
    use uuid::Uuid;

    use super::FileClientStateStore;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("syscon-state-{}", Uuid::new_v4()))
            .join("state.json")
    }

    fn session(token: &str, role: Role) -> Session {
        match BearerToken::new(token) {
            Ok(token) => Session::new(token, role),
            Err(error) => panic!("invalid test token: {error}"),
        }
    }

    async fn cleanup(path: &PathBuf) {
        if let Some(parent) = path.parent() {
            let _ = tokio::fs::remove_dir_all(parent).await;
        }
    }

    #[tokio::test]
    async fn missing_file_means_nothing_stored() {
        let store = FileClientStateStore::new(temp_path());

        assert_eq!(store.load_session().await, Ok(None));
        assert_eq!(store.load_theme().await, Ok(None));
    }

    #[tokio::test]
    async fn session_survives_a_new_store_instance() {
        let path = temp_path();
        let store = FileClientStateStore::new(path.clone());
        assert!(store.save_session(&session("T1", Role::Admin)).await.is_ok());

        let reopened = FileClientStateStore::new(path.clone());
        let loaded = reopened.load_session().await;
        cleanup(&path).await;

        assert_eq!(loaded, Ok(Some(session("T1", Role::Admin))));
    }

    #[tokio::test]
    async fn session_and_theme_are_cleared_independently() {
        let path = temp_path();
        let store = FileClientStateStore::new(path.clone());
        assert!(store.save_session(&session("T1", Role::User)).await.is_ok());
        assert!(store.save_theme(Theme::Dark).await.is_ok());

        assert!(store.clear_session().await.is_ok());
        let theme_after_session_clear = store.load_theme().await;
        assert!(store.save_session(&session("T2", Role::User)).await.is_ok());
        assert!(store.clear_theme().await.is_ok());
        let session_after_theme_clear = store.load_session().await;
        cleanup(&path).await;

        assert_eq!(theme_after_session_clear, Ok(Some(Theme::Dark)));
        assert_eq!(session_after_theme_clear, Ok(Some(session("T2", Role::User))));
    }

    #[tokio::test]
    async fn half_written_session_is_discarded() {
        let path = temp_path();
        let store = FileClientStateStore::new(path.clone());
        if let Some(parent) = path.parent() {
            assert!(tokio::fs::create_dir_all(parent).await.is_ok());
        }
        assert!(
            tokio::fs::write(&path, r#"{"token":"T1","theme":"dark"}"#)
                .await
                .is_ok()
        );

        let loaded = store.load_session().await;
        let theme = store.load_theme().await;
        cleanup(&path).await;

        assert_eq!(loaded, Ok(None));
        assert_eq!(theme, Ok(Some(Theme::Dark)));
    }

    #[tokio::test]
    async fn corrupt_document_reads_as_empty() {
        let path = temp_path();
        let store = FileClientStateStore::new(path.clone());
        if let Some(parent) = path.parent() {
            assert!(tokio::fs::create_dir_all(parent).await.is_ok());
        }
        assert!(tokio::fs::write(&path, "not json").await.is_ok());

        let loaded = store.load_session().await;
        let saved = store.save_theme(Theme::Light).await;
        let theme = store.load_theme().await;
        cleanup(&path).await;

        assert_eq!(loaded, Ok(None));
        assert!(saved.is_ok());
        assert_eq!(theme, Ok(Some(Theme::Light)));
    }

    #[tokio::test]
    async fn clearing_without_a_file_succeeds() {
        let path = temp_path();
        let store = FileClientStateStore::new(path.clone());

        let cleared = store.clear_session().await;
        cleanup(&path).await;

        assert!(cleared.is_ok());
    }
}
