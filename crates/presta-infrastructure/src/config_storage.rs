//! Configuration file storage.
//!
//! Loads the application configuration from ~/.config/presta/config.toml,
//! with environment variable overrides for the backend credentials.

use std::fs;
use std::path::PathBuf;

use presta_core::config::AppConfig;

use crate::paths::PrestaPaths;

/// Environment variable overriding `backend.url`.
pub const ENV_BACKEND_URL: &str = "PRESTA_BACKEND_URL";
/// Environment variable overriding `backend.anon_key`.
pub const ENV_BACKEND_KEY: &str = "PRESTA_BACKEND_KEY";

/// Errors that can occur during configuration loading.
#[derive(Debug)]
pub enum ConfigStorageError {
    /// Configuration file not found and no environment overrides set.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parsing error.
    ParseError(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// A required setting is absent after merging file and environment.
    MissingSetting(&'static str),
}

impl std::fmt::Display for ConfigStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigStorageError::NotFound(path) => {
                write!(f, "Configuration file not found at: {}", path.display())
            }
            ConfigStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            ConfigStorageError::ParseError(e) => write!(f, "TOML parse error: {}", e),
            ConfigStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine config directory")
            }
            ConfigStorageError::MissingSetting(setting) => {
                write!(f, "Missing required setting: {}", setting)
            }
        }
    }
}

impl std::error::Error for ConfigStorageError {}

impl From<std::io::Error> for ConfigStorageError {
    fn from(e: std::io::Error) -> Self {
        ConfigStorageError::IoError(e)
    }
}

impl From<toml::de::Error> for ConfigStorageError {
    fn from(e: toml::de::Error) -> Self {
        ConfigStorageError::ParseError(e)
    }
}

/// Storage for the application configuration file (config.toml).
///
/// Responsibilities:
/// - Load config.toml from ~/.config/presta/
/// - Apply `PRESTA_BACKEND_URL` / `PRESTA_BACKEND_KEY` overrides
/// - Reject configurations without backend credentials
///
/// Does NOT:
/// - Write or modify the configuration (read-only)
/// - Verify the credentials against the backend
pub struct ConfigStorage {
    path: PathBuf,
}

impl ConfigStorage {
    /// Creates a new ConfigStorage with the default path
    /// (~/.config/presta/config.toml).
    pub fn new() -> Result<Self, ConfigStorageError> {
        let path =
            PrestaPaths::config_file().map_err(|_| ConfigStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new ConfigStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the configuration, merging environment overrides over the file.
    ///
    /// The file may be absent entirely when both overrides are set. A
    /// missing backend URL or key after merging is an error.
    pub fn load(&self) -> Result<AppConfig, ConfigStorageError> {
        let url_override = std::env::var(ENV_BACKEND_URL).ok();
        let key_override = std::env::var(ENV_BACKEND_KEY).ok();

        let config = if self.path.exists() {
            let content = fs::read_to_string(&self.path)?;
            toml::from_str(&content)?
        } else {
            if url_override.is_none() && key_override.is_none() {
                return Err(ConfigStorageError::NotFound(self.path.clone()));
            }
            AppConfig::default()
        };

        Self::merge(config, url_override, key_override)
    }

    /// Applies overrides and validates the merged configuration.
    fn merge(
        mut config: AppConfig,
        url_override: Option<String>,
        key_override: Option<String>,
    ) -> Result<AppConfig, ConfigStorageError> {
        if let Some(url) = url_override {
            config.backend.url = url;
        }
        if let Some(key) = key_override {
            config.backend.anon_key = key;
        }

        if config.backend.url.is_empty() {
            return Err(ConfigStorageError::MissingSetting(
                "backend.url (or PRESTA_BACKEND_URL)",
            ));
        }
        if config.backend.anon_key.is_empty() {
            return Err(ConfigStorageError::MissingSetting(
                "backend.anon_key (or PRESTA_BACKEND_KEY)",
            ));
        }

        Ok(config)
    }

    /// Returns the path to the configuration file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
            [backend]
            url = "https://xyz.supabase.co"
            anon_key = "anon-123"
            "#,
        );

        let config = ConfigStorage::with_path(path).load().unwrap();
        assert_eq!(config.backend.url, "https://xyz.supabase.co");
        assert_eq!(config.backend.anon_key, "anon-123");
        assert_eq!(config.backend.table, "loan_applications");
        assert_eq!(config.backend.bucket, "documents");
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[backend\nurl =");

        let result = ConfigStorage::with_path(path).load();
        assert!(matches!(result, Err(ConfigStorageError::ParseError(_))));
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
            [backend]
            url = "https://file.supabase.co"
            anon_key = "file-key"
            "#,
        )
        .unwrap();

        let merged = ConfigStorage::merge(
            config,
            Some("https://env.supabase.co".to_string()),
            Some("env-key".to_string()),
        )
        .unwrap();
        assert_eq!(merged.backend.url, "https://env.supabase.co");
        assert_eq!(merged.backend.anon_key, "env-key");
    }

    #[test]
    fn test_merge_rejects_missing_credentials() {
        let result = ConfigStorage::merge(AppConfig::default(), None, None);
        assert!(matches!(
            result,
            Err(ConfigStorageError::MissingSetting(setting)) if setting.contains("backend.url")
        ));

        let result = ConfigStorage::merge(
            AppConfig::default(),
            Some("https://env.supabase.co".to_string()),
            None,
        );
        assert!(matches!(
            result,
            Err(ConfigStorageError::MissingSetting(setting)) if setting.contains("anon_key")
        ));
    }

    #[test]
    fn test_merge_from_env_only() {
        let merged = ConfigStorage::merge(
            AppConfig::default(),
            Some("https://env.supabase.co".to_string()),
            Some("env-key".to_string()),
        )
        .unwrap();
        assert_eq!(merged.backend.table, "loan_applications");
        assert_eq!(merged.backend.bucket, "documents");
    }
}
