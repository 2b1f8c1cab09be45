//! Documents step: file collection, selfie capture, bank details, the
//! six-way concurrent upload, and the final submission patch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use presta_core::document::{DocumentKind, SelfieCamera, REQUIRED_UPLOADS};
use presta_core::documents_form::{DocumentsError, DocumentsForm};
use presta_core::error::PrestaError;
use presta_core::loan::{ApplicationStatus, LoanApplication};
use presta_core::notice::Notifier;

use crate::session::{LoanSession, StepEntry};

/// Pause before returning to the landing step after a successful
/// submission.
pub const LANDING_REDIRECT_DELAY: Duration = Duration::from_secs(3);

/// Why a documents submission did not go through.
#[derive(Debug, Error)]
pub enum DocumentsSubmitError {
    #[error(transparent)]
    Invalid(#[from] DocumentsError),

    #[error("one or more documents failed to upload")]
    UploadFailed,

    #[error(transparent)]
    Backend(#[from] PrestaError),
}

/// Final wizard step. The form itself lives in core and is exposed as a
/// field; the service adds the camera, the upload fan-out, and the patch
/// that closes the application.
pub struct DocumentsStep {
    session: Arc<LoanSession>,
    camera: Arc<dyn SelfieCamera>,
    notifier: Arc<dyn Notifier>,
    pub form: DocumentsForm,
}

impl DocumentsStep {
    pub fn new(
        session: Arc<LoanSession>,
        camera: Arc<dyn SelfieCamera>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            camera,
            notifier,
            form: DocumentsForm::new(),
        }
    }

    /// Loads the record under completion, resuming a stored session if
    /// needed. The returned record carries the applicant data and approved
    /// conditions the wizard shows read-only.
    pub async fn enter(&self) -> StepEntry {
        self.session.enter_step().await
    }

    /// Fires the camera and stores the frame as the live selfie.
    ///
    /// A capture failure is noticed and leaves the selfie uncaptured; the
    /// applicant may try again.
    pub async fn capture_selfie(&mut self) -> bool {
        match self.camera.capture().await {
            Ok(frame) => {
                self.form.attach(DocumentKind::Selfie, frame);
                self.notifier.success("Selfie captured!");
                true
            }
            Err(e) => {
                tracing::warn!(target: "presta::documents", error = %e, "selfie capture failed");
                self.notifier
                    .error("Could not access the camera. Check your camera setup.");
                false
            }
        }
    }

    /// Validates the form, uploads all six files concurrently, and sends
    /// the closing patch.
    ///
    /// Any failed upload aborts the submission without touching the
    /// record; blobs that already went up stay where they are. On success
    /// the session is cleared and the wizard returns to the landing step
    /// after [`LANDING_REDIRECT_DELAY`].
    pub async fn submit(&self) -> Result<LoanApplication, DocumentsSubmitError> {
        if let Err(e) = self.form.validate() {
            self.notifier.error(&e.to_string());
            return Err(e.into());
        }

        // validate() guarantees every file below is attached
        let mut pending = Vec::with_capacity(REQUIRED_UPLOADS.len() + 1);
        for kind in REQUIRED_UPLOADS.iter().copied().chain([DocumentKind::Selfie]) {
            let file = self
                .form
                .file(kind)
                .ok_or(DocumentsError::MissingDocument(kind))?;
            pending.push((kind, file));
        }

        let session = &self.session;
        let results = futures::future::join_all(
            pending
                .into_iter()
                .map(|(kind, file)| async move { (kind, session.upload_file(file, kind).await) }),
        )
        .await;

        let mut urls: HashMap<DocumentKind, String> = HashMap::new();
        for (kind, url) in results {
            match url {
                Some(url) => {
                    urls.insert(kind, url);
                }
                None => {
                    self.notifier
                        .error("Something went wrong while sending your documents. Try again.");
                    return Err(DocumentsSubmitError::UploadFailed);
                }
            }
        }

        // validate() also guarantees the bank selection
        let bank = self
            .form
            .bank
            .clone()
            .ok_or(DocumentsError::MissingBankDetails)?;
        let fields = LoanApplication {
            rg_front_url: urls.remove(&DocumentKind::RgFront),
            rg_back_url: urls.remove(&DocumentKind::RgBack),
            selfie_with_rg_url: urls.remove(&DocumentKind::SelfieWithRg),
            proof_of_residence_url: urls.remove(&DocumentKind::ProofOfResidence),
            proof_of_income_url: urls.remove(&DocumentKind::ProofOfIncome),
            selfie_url: urls.remove(&DocumentKind::Selfie),
            bank_name: Some(bank.name().to_string()),
            bank_code: Some(bank.code().to_string()),
            bank_agency: Some(self.form.agency.clone()),
            bank_account: Some(self.form.account.clone()),
            bank_account_type: self.form.account_type,
            status: Some(ApplicationStatus::DocumentsSubmitted),
            ..Default::default()
        };

        match self.session.update_application(fields).await {
            Ok(record) => {
                self.notifier.success(
                    "Documents sent for review! Once approved, the money lands right away.",
                );
                if let Err(e) = self.session.set_application_id(None).await {
                    tracing::warn!(target: "presta::documents", error = %e, "failed to clear the finished session");
                }
                Ok(record)
            }
            Err(e) => {
                self.notifier
                    .error("Something went wrong while sending your documents. Try again.");
                Err(e.into())
            }
        }
    }
}
