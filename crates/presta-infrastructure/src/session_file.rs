//! File-backed session store.
//!
//! Persists the active application identifier in a small JSON file under the
//! config directory so an in-progress application survives restarts.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use presta_core::error::{PrestaError, Result};
use presta_core::session::SessionStore;

use crate::paths::PrestaPaths;

/// On-disk shape of the session file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct SessionFile {
    active_application_id: Option<String>,
}

/// Session store backed by `session.json`.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so a crash mid-write never leaves a torn session file.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Creates a store over the default session file location.
    pub fn new() -> Result<Self> {
        let path =
            PrestaPaths::session_file().map_err(|e| PrestaError::config(e.to_string()))?;
        Ok(Self { path })
    }

    /// Creates a store over an explicit file path.
    ///
    /// Primarily used for testing with temporary directories.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    async fn read(&self) -> Result<SessionFile> {
        if !self.path.exists() {
            return Ok(SessionFile::default());
        }
        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(SessionFile::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    async fn write(&self, session: &SessionFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(session)?;

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, json).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;
        Ok(())
    }

    /// Temporary file path next to the target file (`.session.json.tmp`).
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "session.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.read().await?.active_application_id)
    }

    async fn save(&self, application_id: &str) -> Result<()> {
        self.write(&SessionFile {
            active_application_id: Some(application_id.to_string()),
        })
        .await
    }

    async fn clear(&self) -> Result<()> {
        self.write(&SessionFile::default()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileSessionStore {
        FileSessionStore::with_path(dir.path().join("session.json"))
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("app-123").await.unwrap();
        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, Some("app-123".to_string()));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let loaded = store.load().await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_load_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "").unwrap();

        let store = FileSessionStore::with_path(path);
        let loaded = store.load().await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_id() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("app-1").await.unwrap();
        store.save("app-2").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some("app-2".to_string()));
    }

    #[tokio::test]
    async fn test_clear_removes_value() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("app-123").await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_without_session_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("app-123").await.unwrap();
        assert!(!store.temp_path().exists());
    }
}
