//! Document blob store over the Supabase storage interface.

use async_trait::async_trait;

use presta_core::document::{DocumentFile, DocumentStore};
use presta_core::error::Result;

use super::SupabaseClient;

/// Blob store adapter for the documents bucket.
pub struct SupabaseDocumentStore {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseDocumentStore {
    pub fn new(client: SupabaseClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl DocumentStore for SupabaseDocumentStore {
    async fn upload(&self, path: &str, file: &DocumentFile) -> Result<String> {
        tracing::debug!(
            target: "presta::storage",
            bucket = %self.bucket,
            path,
            size = file.bytes.len(),
            "uploading document"
        );

        let response = self
            .client
            .authorize(self.client.http().post(self.client.object_url(&self.bucket, path)))
            .header("Content-Type", &file.mime_type)
            .body(file.bytes.clone())
            .send()
            .await?;
        super::check_response(response).await?;

        Ok(self.client.public_object_url(&self.bucket, path))
    }
}
