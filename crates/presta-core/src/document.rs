//! Document kinds, captured files, and the storage/camera interfaces.

use async_trait::async_trait;

use crate::error::Result;

/// The six blobs attached to an application.
///
/// Five arrive as files picked by the applicant; `Selfie` is captured live
/// through the camera interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum DocumentKind {
    RgFront,
    RgBack,
    SelfieWithRg,
    ProofOfResidence,
    ProofOfIncome,
    Selfie,
}

/// File-picked kinds in the order the documents form checks them.
pub const REQUIRED_UPLOADS: &[DocumentKind] = &[
    DocumentKind::RgFront,
    DocumentKind::RgBack,
    DocumentKind::SelfieWithRg,
    DocumentKind::ProofOfResidence,
    DocumentKind::ProofOfIncome,
];

impl DocumentKind {
    /// Name used as the storage path segment and record column prefix.
    pub fn logical_name(&self) -> &'static str {
        match self {
            Self::RgFront => "rg_front",
            Self::RgBack => "rg_back",
            Self::SelfieWithRg => "selfie_with_rg",
            Self::ProofOfResidence => "proof_of_residence",
            Self::ProofOfIncome => "proof_of_income",
            Self::Selfie => "selfie",
        }
    }

    /// Label shown next to the upload prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RgFront => "ID document, front (RG)",
            Self::RgBack => "ID document, back (RG)",
            Self::SelfieWithRg => "Selfie holding the ID",
            Self::ProofOfResidence => "Proof of residence",
            Self::ProofOfIncome => "Proof of income",
            Self::Selfie => "Live selfie",
        }
    }

    /// Hint about accepted file types; not enforced, the storage keeps
    /// whatever MIME the file carries.
    pub fn accepted_types_hint(&self) -> &'static str {
        match self {
            Self::ProofOfResidence | Self::ProofOfIncome => "image or PDF",
            _ => "image",
        }
    }
}

/// Raw file content headed for the blob store.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFile {
    /// Original file name, kept for logging only.
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Storage object path for one upload.
///
/// Objects are grouped by application and suffixed with the upload instant
/// in unix milliseconds so repeated submissions never collide.
pub fn storage_object_path(application_id: &str, kind: DocumentKind, uploaded_at_ms: i64) -> String {
    format!("{}/{}_{}", application_id, kind.logical_name(), uploaded_at_ms)
}

/// Abstraction over the remote blob store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Uploads the file to the given object path and returns its public URL.
    async fn upload(&self, path: &str, file: &DocumentFile) -> Result<String>;
}

/// Camera used for the live selfie.
#[async_trait]
pub trait SelfieCamera: Send + Sync {
    /// Captures one frame and returns it as an image file.
    async fn capture(&self) -> Result<DocumentFile>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_storage_object_path() {
        let path = storage_object_path("abc-123", DocumentKind::RgFront, 1756100000000);
        assert_eq!(path, "abc-123/rg_front_1756100000000");
    }

    #[test]
    fn test_required_uploads_order() {
        let names: Vec<&str> = REQUIRED_UPLOADS.iter().map(|k| k.logical_name()).collect();
        assert_eq!(
            names,
            vec![
                "rg_front",
                "rg_back",
                "selfie_with_rg",
                "proof_of_residence",
                "proof_of_income"
            ]
        );
    }

    #[test]
    fn test_selfie_is_not_a_file_pick() {
        assert!(!REQUIRED_UPLOADS.contains(&DocumentKind::Selfie));
        assert_eq!(DocumentKind::iter().count(), 6);
    }
}
