//! Local persistence of the active application identifier.

use async_trait::async_trait;

use crate::error::Result;

/// Stores the identifier of the in-progress application between runs.
///
/// This is the restart-survival seam: the record itself always comes from
/// the record store, only the identifier lives locally.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the saved identifier, if a session is in progress.
    async fn load(&self) -> Result<Option<String>>;

    /// Saves the identifier of the application being worked on.
    async fn save(&self, application_id: &str) -> Result<()>;

    /// Removes the saved identifier. A no-op when none is saved.
    async fn clear(&self) -> Result<()>;
}
