//! Approval step: the simulated credit analysis, plan choice, and the
//! decision patch.
//!
//! The analysis runs as one cancellable task behind the [`Underwriter`]
//! interface. Dropping the step before the task answers cancels it, so a
//! torn-down step never receives a decision.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::oneshot;
use tokio_util::sync::{CancellationToken, DropGuard};

use presta_core::decision::{decide, Decision, Underwriter};
use presta_core::error::{PrestaError, Result};
use presta_core::loan::{ApplicationStatus, InstallmentPlan, LoanApplication};
use presta_core::notice::Notifier;
use presta_core::schedule::{installment_schedule, InstallmentDue};

use crate::session::{LoanSession, StepEntry};

/// How long the production credit analysis appears to take.
pub const ANALYSIS_DELAY: Duration = Duration::from_secs(15);

/// Underwriter that waits out a fixed delay before applying the standing
/// decision rule. A real decision service replaces this by implementing
/// [`Underwriter`]; the step itself does not change.
pub struct FixedDelayUnderwriter {
    delay: Duration,
}

impl FixedDelayUnderwriter {
    pub fn new() -> Self {
        Self {
            delay: ANALYSIS_DELAY,
        }
    }

    /// Same rule, different wait. Demos and tests use this to skip the
    /// production delay.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for FixedDelayUnderwriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Underwriter for FixedDelayUnderwriter {
    async fn evaluate(&self, application: &LoanApplication) -> Result<Decision> {
        let requested = application.requested_amount.ok_or_else(|| {
            PrestaError::internal("application under analysis has no requested amount")
        })?;
        tokio::time::sleep(self.delay).await;
        Ok(decide(requested))
    }
}

/// Where the approval step currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPhase {
    AwaitingRecord,
    Analyzing,
    DecisionShown,
    PlanSelected,
    SubmittingDecision,
    Advanced,
}

/// A running analysis: the receiving end of the decision plus the guard
/// that cancels the task when the step goes away.
struct PendingAnalysis {
    outcome: oneshot::Receiver<Result<Decision>>,
    _cancel: DropGuard,
}

/// Second wizard step. Drives the analysis, shows the decision, and
/// patches the record once the applicant accepts a plan.
pub struct ApprovalStep {
    session: Arc<LoanSession>,
    underwriter: Arc<dyn Underwriter>,
    notifier: Arc<dyn Notifier>,
    phase: ApprovalPhase,
    record: Option<LoanApplication>,
    decision: Option<Decision>,
    selected: Option<InstallmentPlan>,
    analysis: Option<PendingAnalysis>,
}

impl ApprovalStep {
    pub fn new(
        session: Arc<LoanSession>,
        underwriter: Arc<dyn Underwriter>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session,
            underwriter,
            notifier,
            phase: ApprovalPhase::AwaitingRecord,
            record: None,
            decision: None,
            selected: None,
            analysis: None,
        }
    }

    pub fn phase(&self) -> ApprovalPhase {
        self.phase
    }

    /// Loads the record under review, resuming a stored session if needed.
    /// A redirect means the wizard goes back to the simulation step.
    pub async fn enter(&mut self) -> StepEntry {
        let entry = self.session.enter_step().await;
        if let StepEntry::Ready(record) = &entry {
            self.record = Some(record.clone());
        }
        entry
    }

    /// Starts the analysis task.
    ///
    /// The task is tied to this step's lifetime: dropping the step before
    /// the underwriter answers cancels it and the answer is never
    /// delivered.
    pub fn begin_analysis(&mut self) -> Result<()> {
        let record = self
            .record
            .clone()
            .ok_or_else(|| PrestaError::internal("analysis requires a loaded application"))?;

        let underwriter = Arc::clone(&self.underwriter);
        let token = CancellationToken::new();
        let task_token = token.clone();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {
                    tracing::debug!(target: "presta::approval", "analysis cancelled before completion");
                }
                decision = underwriter.evaluate(&record) => {
                    // The receiver may already be gone
                    let _ = tx.send(decision);
                }
            }
        });

        self.analysis = Some(PendingAnalysis {
            outcome: rx,
            _cancel: token.drop_guard(),
        });
        self.phase = ApprovalPhase::Analyzing;
        Ok(())
    }

    /// Waits for the running analysis and reveals the decision.
    pub async fn decision(&mut self) -> Result<Decision> {
        let analysis = self
            .analysis
            .take()
            .ok_or_else(|| PrestaError::internal("no analysis in progress"))?;
        let decision = analysis
            .outcome
            .await
            .map_err(|_| PrestaError::internal("analysis task went away"))??;

        self.decision = Some(decision.clone());
        self.phase = ApprovalPhase::DecisionShown;
        Ok(decision)
    }

    /// Chooses a plan and returns the payment schedule it implies,
    /// starting one month from now. Selecting again replaces the previous
    /// choice.
    pub fn select_plan(&mut self, plan: InstallmentPlan) -> Result<Vec<InstallmentDue>> {
        let decision = self
            .decision
            .as_ref()
            .ok_or_else(|| PrestaError::internal("no decision to select a plan from"))?;
        let payment = decision
            .payment_for(plan)
            .ok_or_else(|| PrestaError::internal("decision carries no quote for the plan"))?;

        self.selected = Some(plan);
        self.phase = ApprovalPhase::PlanSelected;
        Ok(installment_schedule(Utc::now(), plan, payment))
    }

    /// Accepts the decision: one patch writes the approved amount, the
    /// chosen plan with its payment, and moves the status to `approved`.
    ///
    /// A failed patch keeps the plan selected so the applicant can retry;
    /// the session emits the notice for it.
    pub async fn confirm(&mut self) -> Result<LoanApplication> {
        let (Some(decision), Some(plan)) = (self.decision.as_ref(), self.selected) else {
            return Err(PrestaError::internal("confirm requires a selected plan"));
        };

        let fields = LoanApplication {
            approved_amount: Some(decision.approved_amount),
            installments_option: Some(plan),
            monthly_payment: decision.payment_for(plan),
            status: Some(ApplicationStatus::Approved),
            ..Default::default()
        };

        self.phase = ApprovalPhase::SubmittingDecision;
        match self.session.update_application(fields).await {
            Ok(record) => {
                self.phase = ApprovalPhase::Advanced;
                self.notifier
                    .success("Conditions accepted! Now, on to the documents.");
                Ok(record)
            }
            Err(e) => {
                self.phase = ApprovalPhase::PlanSelected;
                Err(e)
            }
        }
    }

    /// Declines the offer. The session is cleared and the wizard returns
    /// to the simulation step; the remote record stays `simulated`.
    pub async fn abandon(&mut self) -> Result<()> {
        self.session.set_application_id(None).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::session::test_support::*;

    /// Underwriter that counts completed evaluations.
    struct CountingUnderwriter {
        delay: Duration,
        completed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Underwriter for CountingUnderwriter {
        async fn evaluate(&self, application: &LoanApplication) -> Result<Decision> {
            tokio::time::sleep(self.delay).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(decide(application.requested_amount.unwrap_or(0.0)))
        }
    }

    fn simulated_record(id: &str, requested: f64) -> LoanApplication {
        LoanApplication {
            id: Some(id.to_string()),
            requested_amount: Some(requested),
            installments_option: Some(InstallmentPlan::Six),
            name: Some("Maria da Silva".to_string()),
            status: Some(ApplicationStatus::Simulated),
            ..Default::default()
        }
    }

    struct Harness {
        repository: Arc<FakeRepository>,
        store: Arc<FakeSessionStore>,
        notifier: Arc<FakeNotifier>,
        step: ApprovalStep,
    }

    fn harness_with(record: Option<LoanApplication>, underwriter: Arc<dyn Underwriter>) -> Harness {
        let (repository, store) = match record {
            Some(record) => {
                let id = record.id.clone().unwrap();
                (
                    Arc::new(FakeRepository::with_row(record)),
                    Arc::new(FakeSessionStore::with_saved(&id)),
                )
            }
            None => (
                Arc::new(FakeRepository::new()),
                Arc::new(FakeSessionStore::new()),
            ),
        };
        let notifier = Arc::new(FakeNotifier::new());
        let session = Arc::new(LoanSession::new(
            repository.clone(),
            Arc::new(FakeDocumentStore::new()),
            store.clone(),
            notifier.clone(),
        ));
        let step = ApprovalStep::new(session, underwriter, notifier.clone());
        Harness {
            repository,
            store,
            notifier,
            step,
        }
    }

    fn harness(record: LoanApplication) -> Harness {
        harness_with(
            Some(record),
            Arc::new(FixedDelayUnderwriter::with_delay(Duration::ZERO)),
        )
    }

    #[tokio::test]
    async fn test_underwriter_applies_the_decision_rule() {
        let underwriter = FixedDelayUnderwriter::with_delay(Duration::ZERO);
        let decision = underwriter
            .evaluate(&simulated_record("app-1", 1000.0))
            .await
            .unwrap();

        assert_eq!(decision.approved_amount, 900.0);
        assert_eq!(decision.total_with_interest, 1170.0);
        assert_eq!(decision.payment_for(InstallmentPlan::Six), Some(195.0));
    }

    #[tokio::test]
    async fn test_enter_without_a_session_redirects() {
        let mut h = harness_with(
            None,
            Arc::new(FixedDelayUnderwriter::with_delay(Duration::ZERO)),
        );

        let entry = h.step.enter().await;

        assert_eq!(entry, StepEntry::RedirectToSimulation);
        assert_eq!(h.step.phase(), ApprovalPhase::AwaitingRecord);
        assert_eq!(
            h.notifier.errors(),
            vec!["No simulation found. Please start over."]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_analysis_waits_out_the_production_delay() {
        let mut h = harness_with(
            Some(simulated_record("app-1", 1000.0)),
            Arc::new(FixedDelayUnderwriter::new()),
        );
        h.step.enter().await;

        let started = tokio::time::Instant::now();
        h.step.begin_analysis().unwrap();
        assert_eq!(h.step.phase(), ApprovalPhase::Analyzing);

        let decision = h.step.decision().await.unwrap();

        assert!(started.elapsed() >= ANALYSIS_DELAY);
        assert_eq!(decision.approved_amount, 900.0);
        assert_eq!(h.step.phase(), ApprovalPhase::DecisionShown);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_the_step_cancels_the_analysis() {
        let completed = Arc::new(AtomicUsize::new(0));
        let underwriter = Arc::new(CountingUnderwriter {
            delay: ANALYSIS_DELAY,
            completed: completed.clone(),
        });
        let mut h = harness_with(Some(simulated_record("app-1", 1000.0)), underwriter);
        h.step.enter().await;
        h.step.begin_analysis().unwrap();

        drop(h.step);

        // Give the cancelled task every chance to run to completion
        tokio::time::advance(ANALYSIS_DELAY * 2).await;
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_select_plan_yields_the_schedule() {
        let mut h = harness(simulated_record("app-1", 1000.0));
        h.step.enter().await;
        h.step.begin_analysis().unwrap();
        h.step.decision().await.unwrap();

        let schedule = h.step.select_plan(InstallmentPlan::Twelve).unwrap();

        assert_eq!(schedule.len(), 12);
        // floor(1170 / 12)
        assert!(schedule.iter().all(|due| due.amount == 97.0));
        assert_eq!(h.step.phase(), ApprovalPhase::PlanSelected);
    }

    #[tokio::test]
    async fn test_confirm_patches_the_decision() {
        let mut h = harness(simulated_record("app-1", 1000.0));
        h.step.enter().await;
        h.step.begin_analysis().unwrap();
        h.step.decision().await.unwrap();
        h.step.select_plan(InstallmentPlan::Three).unwrap();
        // A second selection replaces the first
        h.step.select_plan(InstallmentPlan::Six).unwrap();

        let record = h.step.confirm().await.unwrap();

        assert_eq!(record.approved_amount, Some(900.0));
        assert_eq!(record.installments_option, Some(InstallmentPlan::Six));
        assert_eq!(record.monthly_payment, Some(195.0));
        assert_eq!(record.status, Some(ApplicationStatus::Approved));
        assert_eq!(h.step.phase(), ApprovalPhase::Advanced);

        let stored = h.repository.row("app-1").unwrap();
        assert_eq!(stored.status, Some(ApplicationStatus::Approved));
        assert!(h
            .notifier
            .successes()
            .contains(&"Conditions accepted! Now, on to the documents.".to_string()));
    }

    #[tokio::test]
    async fn test_confirm_requires_a_selected_plan() {
        let mut h = harness(simulated_record("app-1", 1000.0));
        h.step.enter().await;
        h.step.begin_analysis().unwrap();
        h.step.decision().await.unwrap();

        let result = h.step.confirm().await;

        assert!(result.is_err());
        assert_eq!(h.step.phase(), ApprovalPhase::DecisionShown);
        assert_eq!(*h.repository.update_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_patch_keeps_the_plan_selected() {
        let mut h = harness(simulated_record("app-1", 1000.0));
        h.step.enter().await;
        h.step.begin_analysis().unwrap();
        h.step.decision().await.unwrap();
        h.step.select_plan(InstallmentPlan::Six).unwrap();
        h.repository.set_fail_update(true);

        let result = h.step.confirm().await;

        assert!(result.is_err());
        assert_eq!(h.step.phase(), ApprovalPhase::PlanSelected);
        let stored = h.repository.row("app-1").unwrap();
        assert_eq!(stored.status, Some(ApplicationStatus::Simulated));
    }

    #[tokio::test]
    async fn test_abandon_clears_the_session_but_keeps_the_record() {
        let mut h = harness(simulated_record("app-1", 1000.0));
        h.step.enter().await;
        h.step.begin_analysis().unwrap();
        h.step.decision().await.unwrap();

        h.step.abandon().await.unwrap();

        assert!(h.store.saved().is_none());
        let stored = h.repository.row("app-1").unwrap();
        assert_eq!(stored.status, Some(ApplicationStatus::Simulated));
    }
}
