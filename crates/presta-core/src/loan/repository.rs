//! Repository interface for loan application records.

use async_trait::async_trait;

use crate::error::Result;
use crate::loan::model::LoanApplication;

/// Abstraction over the remote record store for loan applications.
///
/// Implementations talk to the backend's REST surface. Payloads are partial
/// records: only the fields set on the passed `LoanApplication` are sent.
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Inserts a new record and returns the stored row, including the
    /// identifier and creation timestamp assigned by the store.
    async fn insert(&self, fields: &LoanApplication) -> Result<LoanApplication>;

    /// Fetches the full record with the given identifier.
    async fn fetch(&self, id: &str) -> Result<LoanApplication>;

    /// Applies a partial update to the record with the given identifier and
    /// returns the updated row.
    async fn update(&self, id: &str, fields: &LoanApplication) -> Result<LoanApplication>;
}
