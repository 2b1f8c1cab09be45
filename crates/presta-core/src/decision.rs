//! Approval decision arithmetic and the underwriter interface.

use async_trait::async_trait;
use strum::IntoEnumIterator;

use crate::error::Result;
use crate::loan::{InstallmentPlan, LoanApplication};
use crate::quote::{self, PlanQuote};

/// Amount held back from requests above the minimum.
pub const APPROVAL_DEDUCTION: f64 = 100.0;

/// The outcome of a credit analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    /// Amount the applicant may actually borrow.
    pub approved_amount: f64,
    /// Total owed on the approved amount, flat interest applied.
    pub total_with_interest: f64,
    /// Monthly payment per offered plan, floored to whole units.
    pub plans: Vec<PlanQuote>,
}

impl Decision {
    /// Monthly payment for the given plan.
    pub fn payment_for(&self, plan: InstallmentPlan) -> Option<f64> {
        self.plans
            .iter()
            .find(|quote| quote.plan == plan)
            .map(|quote| quote.monthly_payment)
    }
}

/// Computes the decision for a requested amount.
///
/// Requests above 100 are approved at 100 less than requested; requests of
/// 100 or below are approved unchanged. Per-plan payments divide the
/// after-interest total and floor the result, so the displayed installments
/// are whole units.
pub fn decide(requested_amount: f64) -> Decision {
    let approved_amount = if requested_amount > APPROVAL_DEDUCTION {
        requested_amount - APPROVAL_DEDUCTION
    } else {
        requested_amount
    };
    let total_with_interest = quote::total_with_interest(approved_amount);
    let plans = InstallmentPlan::iter()
        .map(|plan| PlanQuote {
            plan,
            monthly_payment: (total_with_interest / plan.months() as f64).floor(),
        })
        .collect();

    Decision {
        approved_amount,
        total_with_interest,
        plans,
    }
}

/// Credit analysis interface.
///
/// The production implementation simulates a fixed-length analysis before
/// answering; a real decision service can be substituted without touching
/// the approval step's state machine.
#[async_trait]
pub trait Underwriter: Send + Sync {
    /// Evaluates an application and produces a decision.
    async fn evaluate(&self, application: &LoanApplication) -> Result<Decision>;
}
