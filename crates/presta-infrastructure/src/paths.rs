//! Unified path management for presta's local files.
//!
//! Everything presta keeps on disk lives under one platform config
//! directory: the configuration file and the session file.

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Platform config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for presta.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/presta/            # Config directory (XDG on Linux)
/// ├── config.toml              # Backend and camera configuration
/// └── session.json             # Active application identifier
/// ```
pub struct PrestaPaths;

impl PrestaPaths {
    /// Returns the presta configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/presta/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join("presta"))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to the session file holding the active application
    /// identifier.
    pub fn session_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("session.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_dir() {
        let config_dir = PrestaPaths::config_dir().unwrap();
        assert!(config_dir.ends_with("presta"));
    }

    #[test]
    fn test_config_file() {
        let config_file = PrestaPaths::config_file().unwrap();
        assert!(config_file.ends_with("config.toml"));
        // Verify it's under config_dir
        let config_dir = PrestaPaths::config_dir().unwrap();
        assert!(config_file.starts_with(&config_dir));
    }

    #[test]
    fn test_session_file() {
        let session_file = PrestaPaths::session_file().unwrap();
        assert!(session_file.ends_with("session.json"));
        // Verify it's under config_dir
        let config_dir = PrestaPaths::config_dir().unwrap();
        assert!(session_file.starts_with(&config_dir));
    }
}
