//! Simulation quote arithmetic.
//!
//! A quote applies a flat 30% interest to the requested amount, regardless of
//! the installment count. Monetary values are `f64` end to end, matching the
//! record store's numeric columns; simulation payments are shown undivided
//! remainders (no rounding), the approval step is where flooring happens.

use strum::IntoEnumIterator;

use crate::loan::InstallmentPlan;

/// Flat interest rate applied to every quote.
pub const INTEREST_RATE: f64 = 0.30;

/// Smallest amount a simulation accepts.
pub const MIN_AMOUNT: f64 = 100.0;

/// Largest amount a simulation accepts.
pub const MAX_AMOUNT: f64 = 2500.0;

/// Amounts move in steps of 50 between the bounds.
pub const AMOUNT_STEP: f64 = 50.0;

/// Starting amount presented by the simulation form.
pub const DEFAULT_AMOUNT: f64 = 1000.0;

/// A plan paired with its monthly payment.
///
/// Payments always travel with their plan so callers never have to line up
/// parallel arrays by position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanQuote {
    pub plan: InstallmentPlan,
    pub monthly_payment: f64,
}

/// Total amount owed for a requested amount: `amount × 1.30`.
pub fn total_with_interest(amount: f64) -> f64 {
    amount * (1.0 + INTEREST_RATE)
}

/// Monthly payment for one plan at the given total, without rounding.
pub fn monthly_payment(total: f64, plan: InstallmentPlan) -> f64 {
    total / plan.months() as f64
}

/// Per-plan payments for the given total, one entry per offered plan.
pub fn plan_quotes(total: f64) -> Vec<PlanQuote> {
    InstallmentPlan::iter()
        .map(|plan| PlanQuote {
            plan,
            monthly_payment: monthly_payment(total, plan),
        })
        .collect()
}

/// Whether an amount lies inside the offered range.
pub fn amount_in_range(amount: f64) -> bool {
    (MIN_AMOUNT..=MAX_AMOUNT).contains(&amount)
}

/// Whether an amount sits on the 50-unit grid.
pub fn amount_on_step(amount: f64) -> bool {
    amount.rem_euclid(AMOUNT_STEP) == 0.0
}
