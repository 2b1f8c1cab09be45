//! Simulation step: validates the filled form and creates the record.

use std::sync::Arc;

use thiserror::Error;

use presta_core::error::PrestaError;
use presta_core::loan::LoanApplication;
use presta_core::notice::Notifier;
use presta_core::simulation::{SimulationError, SimulationForm};

use crate::session::LoanSession;

/// Why a simulation submission did not go through.
#[derive(Debug, Error)]
pub enum SimulationSubmitError {
    #[error(transparent)]
    Invalid(#[from] SimulationError),
    #[error(transparent)]
    Backend(#[from] PrestaError),
}

/// First wizard step. The form itself lives in core; this service checks
/// it and turns it into the remote record the rest of the wizard works on.
pub struct SimulationStep {
    session: Arc<LoanSession>,
    notifier: Arc<dyn Notifier>,
}

impl SimulationStep {
    pub fn new(session: Arc<LoanSession>, notifier: Arc<dyn Notifier>) -> Self {
        Self { session, notifier }
    }

    /// Validates the form and creates the application record.
    ///
    /// A validation failure is noticed and nothing is sent. A create
    /// failure keeps the wizard on this step; the session emits the notice
    /// for it. On success the new record (status `simulated`) is returned
    /// and the wizard advances to approval.
    pub async fn submit(
        &self,
        form: &SimulationForm,
    ) -> Result<LoanApplication, SimulationSubmitError> {
        let fields = match form.to_application() {
            Ok(fields) => fields,
            Err(e) => {
                self.notifier.error(&e.to_string());
                return Err(e.into());
            }
        };

        let record = self.session.create_application(fields).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::test_support::*;
    use presta_core::loan::{ApplicationStatus, InstallmentPlan};

    struct Harness {
        repository: Arc<FakeRepository>,
        store: Arc<FakeSessionStore>,
        notifier: Arc<FakeNotifier>,
        step: SimulationStep,
    }

    fn harness() -> Harness {
        let repository = Arc::new(FakeRepository::new());
        let store = Arc::new(FakeSessionStore::new());
        let notifier = Arc::new(FakeNotifier::new());
        let session = Arc::new(LoanSession::new(
            repository.clone(),
            Arc::new(FakeDocumentStore::new()),
            store.clone(),
            notifier.clone(),
        ));
        let step = SimulationStep::new(session, notifier.clone());
        Harness {
            repository,
            store,
            notifier,
            step,
        }
    }

    fn filled_form() -> SimulationForm {
        SimulationForm {
            amount: 1000.0,
            plan: Some(InstallmentPlan::Six),
            name: "Maria da Silva".to_string(),
            email: "maria@example.com".to_string(),
            phone: "11999990000".to_string(),
            cpf: "123.456.789-00".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_submit_creates_a_simulated_record() {
        let h = harness();

        let record = h.step.submit(&filled_form()).await.unwrap();

        assert_eq!(record.status, Some(ApplicationStatus::Simulated));
        assert_eq!(record.requested_amount, Some(1000.0));
        assert_eq!(record.total_with_interest, Some(1300.0));
        assert_eq!(record.monthly_payment, Some(1300.0 / 6.0));
        assert_eq!(h.store.saved(), record.id);
        assert_eq!(h.repository.rows.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_form_creates_nothing() {
        let h = harness();
        let mut form = filled_form();
        form.cpf.clear();

        let result = h.step.submit(&form).await;

        assert!(matches!(result, Err(SimulationSubmitError::Invalid(_))));
        assert!(h.repository.rows.lock().unwrap().is_empty());
        assert!(h.store.saved().is_none());
        assert_eq!(
            h.notifier.errors(),
            vec!["fill in all required fields (name, email, phone, CPF)"]
        );
    }

    #[tokio::test]
    async fn test_create_failure_stays_on_the_step() {
        let h = harness();
        h.repository.set_fail_insert(true);

        let result = h.step.submit(&filled_form()).await;

        assert!(matches!(result, Err(SimulationSubmitError::Backend(_))));
        assert!(h.store.saved().is_none());
        assert_eq!(h.notifier.errors(), vec!["Could not create your simulation."]);
    }
}
