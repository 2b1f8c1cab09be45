//! Application session orchestration.
//!
//! `LoanSession` is the single source of truth for the in-progress loan
//! application. It owns the active identifier, mirrors it into the local
//! session store so a restart resumes the same record, caches the last
//! known copy of the record, and funnels every remote operation the wizard
//! steps perform.

use std::sync::Arc;

use tokio::sync::RwLock;

use presta_core::document::{storage_object_path, DocumentFile, DocumentKind, DocumentStore};
use presta_core::error::{PrestaError, Result};
use presta_core::loan::{ApplicationRepository, ApplicationStatus, LoanApplication};
use presta_core::notice::Notifier;
use presta_core::session::SessionStore;

/// Outcome of resuming a stored session.
#[derive(Debug, Clone, PartialEq)]
pub enum ResumeOutcome {
    /// Nothing stored; start from the simulation step.
    NoSession,
    /// The stored record was fetched (or already cached).
    Resumed(LoanApplication),
    /// The stored identifier was unusable; the session was cleared and the
    /// wizard should land on the simulation step.
    SessionCleared,
}

/// Outcome of a guarded step entry. The approval and documents steps both
/// require an active application before they do anything.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEntry {
    /// The active record; the step may proceed.
    Ready(LoanApplication),
    /// No usable session; the wizard returns to the simulation step.
    RedirectToSimulation,
}

/// Use case holding the active loan application across wizard steps.
///
/// # Thread Safety
///
/// All collaborators are shared through `Arc` and the mutable state lives
/// behind `RwLock`s, so one instance can be shared by every step.
pub struct LoanSession {
    /// Remote record store for application rows
    repository: Arc<dyn ApplicationRepository>,
    /// Remote blob store for document uploads
    documents: Arc<dyn DocumentStore>,
    /// Local persistence of the active identifier
    session_store: Arc<dyn SessionStore>,
    /// Sink for user-facing notices
    notifier: Arc<dyn Notifier>,
    /// Identifier of the in-progress application
    application_id: RwLock<Option<String>>,
    /// Last known copy of the record
    record: RwLock<Option<LoanApplication>>,
}

impl LoanSession {
    pub fn new(
        repository: Arc<dyn ApplicationRepository>,
        documents: Arc<dyn DocumentStore>,
        session_store: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            documents,
            session_store,
            notifier,
            application_id: RwLock::new(None),
            record: RwLock::new(None),
        }
    }

    /// Identifier of the active application, if any.
    pub async fn application_id(&self) -> Option<String> {
        self.application_id.read().await.clone()
    }

    /// Last known copy of the active record, if any.
    pub async fn record(&self) -> Option<LoanApplication> {
        self.record.read().await.clone()
    }

    /// Sets or clears the active identifier, mirroring it into the session
    /// store. The cached record is dropped whenever it no longer belongs to
    /// the active identifier.
    pub async fn set_application_id(&self, id: Option<String>) -> Result<()> {
        {
            let mut record = self.record.write().await;
            let keep = match (&id, record.as_ref()) {
                (Some(new_id), Some(cached)) => cached.id.as_deref() == Some(new_id.as_str()),
                _ => false,
            };
            if !keep {
                *record = None;
            }
        }
        *self.application_id.write().await = id.clone();

        match id {
            Some(id) => self.session_store.save(&id).await,
            None => self.session_store.clear().await,
        }
    }

    /// Creates the remote record for a filled simulation.
    ///
    /// The status is forced to `simulated`. On success the store-assigned
    /// identifier becomes the active session (persisted for resume) and the
    /// returned row is cached. On failure nothing changes locally.
    pub async fn create_application(&self, fields: LoanApplication) -> Result<LoanApplication> {
        let mut fields = fields;
        fields.status = Some(ApplicationStatus::Simulated);

        tracing::info!(target: "presta::session", "creating application record");
        match self.repository.insert(&fields).await {
            Ok(record) => {
                let id = record.id.clone().ok_or_else(|| {
                    PrestaError::backend("insert returned a record without an identifier")
                })?;

                *self.application_id.write().await = Some(id.clone());
                *self.record.write().await = Some(record.clone());
                if let Err(e) = self.session_store.save(&id).await {
                    // The wizard keeps working in memory; only restart resume is lost
                    tracing::warn!(target: "presta::session", error = %e, "failed to persist session id");
                }

                self.notifier
                    .success("Simulation sent! Analyzing your request...");
                Ok(record)
            }
            Err(e) => {
                tracing::error!(target: "presta::session", error = %e, "failed to create application");
                self.notifier.error("Could not create your simulation.");
                Err(e)
            }
        }
    }

    /// Applies a partial update to the active record.
    ///
    /// On success the cache is replaced with the returned row. On failure
    /// the cache keeps the previous copy; the next successful fetch or
    /// update reconciles it.
    pub async fn update_application(&self, fields: LoanApplication) -> Result<LoanApplication> {
        let Some(id) = self.application_id().await else {
            self.notifier.error("No active application found.");
            return Err(PrestaError::not_found("active_application", "none"));
        };

        tracing::info!(target: "presta::session", id, "updating application record");
        match self.repository.update(&id, &fields).await {
            Ok(record) => {
                *self.record.write().await = Some(record.clone());
                Ok(record)
            }
            Err(e) => {
                tracing::error!(target: "presta::session", error = %e, "failed to update application");
                self.notifier.error("Could not update your application.");
                Err(e)
            }
        }
    }

    /// Uploads one document blob and returns its public URL.
    ///
    /// The object path groups uploads by application and appends the upload
    /// instant in milliseconds so repeated submissions never collide. Any
    /// failure is reported as a notice and surfaces as `None`; blobs that
    /// already went up are not removed.
    pub async fn upload_file(&self, file: &DocumentFile, kind: DocumentKind) -> Option<String> {
        let Some(id) = self.application_id().await else {
            self.notifier.error("No active application to upload for.");
            return None;
        };

        let path = storage_object_path(&id, kind, chrono::Utc::now().timestamp_millis());
        match self.documents.upload(&path, file).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::error!(target: "presta::session", error = %e, path, "document upload failed");
                self.notifier
                    .error(&format!("Could not upload file: {}", kind.logical_name()));
                None
            }
        }
    }

    /// Entry guard shared by the steps after simulation.
    ///
    /// Resumes the stored session and notices the user when there is none;
    /// a cleared session already carried its own notice.
    pub async fn enter_step(&self) -> StepEntry {
        match self.resume().await {
            ResumeOutcome::Resumed(record) => StepEntry::Ready(record),
            ResumeOutcome::NoSession => {
                self.notifier
                    .error("No simulation found. Please start over.");
                StepEntry::RedirectToSimulation
            }
            ResumeOutcome::SessionCleared => StepEntry::RedirectToSimulation,
        }
    }

    /// Resumes the session saved by a previous run.
    ///
    /// Loads the stored identifier when none is active yet and fetches the
    /// record when it is not cached. An unusable identifier (fetch failure)
    /// clears the session, both in memory and on disk.
    pub async fn resume(&self) -> ResumeOutcome {
        if self.application_id().await.is_none() {
            match self.session_store.load().await {
                Ok(Some(saved)) => {
                    *self.application_id.write().await = Some(saved);
                }
                Ok(None) => return ResumeOutcome::NoSession,
                Err(e) => {
                    tracing::warn!(target: "presta::session", error = %e, "failed to read session store");
                    return ResumeOutcome::NoSession;
                }
            }
        }

        if let Some(record) = self.record().await {
            return ResumeOutcome::Resumed(record);
        }

        // Checked above; resume never races itself
        let Some(id) = self.application_id().await else {
            return ResumeOutcome::NoSession;
        };

        tracing::info!(target: "presta::session", id, "resuming stored application");
        match self.repository.fetch(&id).await {
            Ok(record) => {
                *self.record.write().await = Some(record.clone());
                ResumeOutcome::Resumed(record)
            }
            Err(e) => {
                tracing::warn!(target: "presta::session", error = %e, id, "stored application could not be fetched");
                self.notifier.error("Could not fetch your application data.");
                if let Err(e) = self.set_application_id(None).await {
                    tracing::warn!(target: "presta::session", error = %e, "failed to clear session store");
                }
                ResumeOutcome::SessionCleared
            }
        }
    }
}
