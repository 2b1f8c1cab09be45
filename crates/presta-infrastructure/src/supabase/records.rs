//! Loan application repository over the Supabase REST interface.

use async_trait::async_trait;

use presta_core::error::{PrestaError, Result};
use presta_core::loan::{ApplicationRepository, LoanApplication};

use super::SupabaseClient;

/// Accept header asking PostgREST for one object instead of a row array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Record store adapter for the loan applications table.
///
/// Every call sends the partial record as-is; unset fields never appear in
/// the payload, so updates patch exactly the fields the caller set.
pub struct SupabaseApplicationRepository {
    client: SupabaseClient,
    table: String,
}

impl SupabaseApplicationRepository {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Endpoint filtered down to one record by identifier.
    fn row_url(&self, id: &str) -> String {
        format!("{}?id=eq.{}", self.client.rest_url(&self.table), id)
    }
}

#[async_trait]
impl ApplicationRepository for SupabaseApplicationRepository {
    async fn insert(&self, fields: &LoanApplication) -> Result<LoanApplication> {
        tracing::debug!(target: "presta::backend", table = %self.table, "inserting application record");

        let response = self
            .client
            .authorize(self.client.http().post(self.client.rest_url(&self.table)))
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(fields)
            .send()
            .await?;
        let response = super::check_response(response).await?;

        Ok(response.json().await?)
    }

    async fn fetch(&self, id: &str) -> Result<LoanApplication> {
        tracing::debug!(target: "presta::backend", table = %self.table, id, "fetching application record");

        let url = format!("{}&select=*", self.row_url(id));
        let response = self
            .client
            .authorize(self.client.http().get(url))
            .header("Accept", SINGLE_OBJECT)
            .send()
            .await?;

        // PostgREST answers 406 when the single-object filter matches nothing
        if response.status() == reqwest::StatusCode::NOT_ACCEPTABLE {
            return Err(PrestaError::not_found("loan_application", id));
        }
        let response = super::check_response(response).await?;

        Ok(response.json().await?)
    }

    async fn update(&self, id: &str, fields: &LoanApplication) -> Result<LoanApplication> {
        tracing::debug!(target: "presta::backend", table = %self.table, id, "updating application record");

        let response = self
            .client
            .authorize(self.client.http().patch(self.row_url(id)))
            .header("Prefer", "return=representation")
            .header("Accept", SINGLE_OBJECT)
            .json(fields)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_ACCEPTABLE {
            return Err(PrestaError::not_found("loan_application", id));
        }
        let response = super::check_response(response).await?;

        Ok(response.json().await?)
    }
}
