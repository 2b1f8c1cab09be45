//! Loading local files as documents.

use std::path::Path;

use presta_core::document::DocumentFile;
use presta_core::error::{PrestaError, Result};

/// Infers a MIME type from the filename.
fn infer_mime_type(filename: &str) -> String {
    mime_guess::from_path(filename)
        .first_or_octet_stream()
        .to_string()
}

/// Reads a local file into a document ready for upload.
///
/// The MIME type is inferred from the extension; files without a known
/// extension go up as `application/octet-stream`, the storage keeps
/// whatever it is given.
pub async fn load_document_file(path: &Path) -> Result<DocumentFile> {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| PrestaError::io(format!("Not a file path: {}", path.display())))?;

    let bytes = tokio::fs::read(path).await?;
    let mime_type = infer_mime_type(&name);

    tracing::debug!(target: "presta::files", name, mime_type, size = bytes.len(), "loaded document file");

    Ok(DocumentFile {
        name,
        mime_type,
        bytes,
    })
}
