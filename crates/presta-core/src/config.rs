use serde::{Deserialize, Serialize};

/// Remote backend connection settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Base URL of the backend project, e.g. `https://xyz.supabase.co`.
    /// May also arrive via environment override at load time.
    #[serde(default)]
    pub url: String,
    /// Anonymous API key sent with every request.
    #[serde(default)]
    pub anon_key: String,
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            table: default_table(),
            bucket: default_bucket(),
        }
    }
}

fn default_table() -> String {
    "loan_applications".to_string()
}

fn default_bucket() -> String {
    "documents".to_string()
}

/// Selfie camera settings.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct CameraConfig {
    /// Command line that captures one frame; `{output}` is replaced with the
    /// path the JPEG must be written to. Capture is unavailable when unset.
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_and_bucket_default() {
        let config: AppConfig = toml::from_str(
            r#"
            [backend]
            url = "https://xyz.supabase.co"
            anon_key = "anon"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.table, "loan_applications");
        assert_eq!(config.backend.bucket, "documents");
        assert!(config.camera.command.is_none());
    }

    #[test]
    fn test_overrides_parse() {
        let config: AppConfig = toml::from_str(
            r#"
            [backend]
            url = "https://xyz.supabase.co"
            anon_key = "anon"
            table = "applications"
            bucket = "uploads"

            [camera]
            command = "fswebcam --no-banner --save {output}"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.table, "applications");
        assert_eq!(config.backend.bucket, "uploads");
        assert_eq!(
            config.camera.command.as_deref(),
            Some("fswebcam --no-banner --save {output}")
        );
    }
}
