//! Supabase adapters for the record store and blob storage.
//!
//! This module holds the HTTP plumbing shared by both adapters: URL
//! construction, project credentials, and error mapping. The REST interface
//! follows PostgREST conventions; storage uses the object API.

mod records;
mod storage;

pub use records::SupabaseApplicationRepository;
pub use storage::SupabaseDocumentStore;

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use presta_core::error::{PrestaError, Result};

const REST_PATH: &str = "rest/v1";
const STORAGE_PATH: &str = "storage/v1";

/// Shared connection to one Supabase project.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Creates a client for the project at `base_url` authenticated with the
    /// anonymous key. A trailing slash on the URL is tolerated.
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            anon_key: anon_key.into(),
        }
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// REST endpoint of a table.
    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, table)
    }

    /// Upload endpoint of a storage object.
    pub(crate) fn object_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/object/{}/{}", self.base_url, STORAGE_PATH, bucket, path)
    }

    /// Public download URL of a storage object.
    pub(crate) fn public_object_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/{}/object/public/{}/{}",
            self.base_url, STORAGE_PATH, bucket, path
        )
    }

    /// Attaches the project credentials to a request.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }
}

/// Error body shape shared by PostgREST and the storage API.
#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Turns a non-success response into a backend error, surfacing the message
/// from the response body when one is present.
pub(crate) async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error body".to_string());
    Err(map_http_error(status, body))
}

fn map_http_error(status: StatusCode, body: String) -> PrestaError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.message)
        .unwrap_or(body);
    PrestaError::backend(format!("{}: {}", status, message))
}
