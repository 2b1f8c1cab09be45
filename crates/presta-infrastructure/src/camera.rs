//! Command-driven selfie camera.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use presta_core::document::{DocumentFile, SelfieCamera};
use presta_core::error::{PrestaError, Result};

/// Placeholder in the configured command line replaced with the capture
/// output path.
const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Camera that shells out to a configured capture command.
///
/// The command line is split on whitespace; every token containing
/// `{output}` has it replaced with a temporary JPEG path the command must
/// write to. With no command configured, capture is unavailable.
pub struct CommandCamera {
    command: Option<String>,
}

impl CommandCamera {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    /// Where the capture command writes its frame.
    fn output_path() -> PathBuf {
        std::env::temp_dir().join(format!(
            "presta-selfie-{}.jpg",
            chrono::Utc::now().timestamp_millis()
        ))
    }

    async fn run_capture(&self, command_line: &str, output_path: &Path) -> Result<()> {
        let output_str = output_path.to_string_lossy();
        let mut parts = command_line
            .split_whitespace()
            .map(|part| part.replace(OUTPUT_PLACEHOLDER, &output_str));
        let program = parts
            .next()
            .ok_or_else(|| PrestaError::camera("Capture command is empty"))?;

        let mut cmd = tokio::process::Command::new(program);
        cmd.args(parts);

        tracing::debug!(target: "presta::camera", command = command_line, "running capture command");

        let output = cmd
            .output()
            .await
            .map_err(|e| PrestaError::camera(format!("Failed to run capture command: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrestaError::camera(format!(
                "Capture command failed ({}): {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl SelfieCamera for CommandCamera {
    async fn capture(&self) -> Result<DocumentFile> {
        let command_line = self.command.as_deref().ok_or_else(|| {
            PrestaError::camera(
                "No capture command configured (set [camera] command in config.toml)",
            )
        })?;

        let output_path = Self::output_path();
        self.run_capture(command_line, &output_path).await?;

        let bytes = tokio::fs::read(&output_path)
            .await
            .map_err(|e| PrestaError::camera(format!("Capture command wrote no image: {}", e)))?;
        // Best effort cleanup of the temporary frame
        let _ = tokio::fs::remove_file(&output_path).await;

        Ok(DocumentFile {
            name: "selfie.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            bytes,
        })
    }
}
