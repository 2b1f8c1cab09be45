//! Simulation form: input, validation, and the insert payload it produces.

use thiserror::Error;

use crate::loan::{InstallmentPlan, LoanApplication};
use crate::quote::{self, AMOUNT_STEP, DEFAULT_AMOUNT, MAX_AMOUNT, MIN_AMOUNT};

/// Validation failures for the simulation form, in the order they are
/// checked. The first failure aborts the submission; no record is created.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("fill in all required fields (name, email, phone, CPF)")]
    MissingRequiredFields,

    #[error("select the number of installments")]
    PlanNotSelected,

    #[error("amount must be between {MIN_AMOUNT} and {MAX_AMOUNT}")]
    AmountOutOfRange,

    #[error("amount must be a multiple of {AMOUNT_STEP}")]
    AmountOffStep,
}

/// Everything the applicant enters on the simulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationForm {
    pub amount: f64,
    pub plan: Option<InstallmentPlan>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub cpf: String,
    pub address: String,
    pub profession: String,
    pub salary: String,
}

impl Default for SimulationForm {
    fn default() -> Self {
        Self {
            amount: DEFAULT_AMOUNT,
            plan: None,
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            cpf: String::new(),
            address: String::new(),
            profession: String::new(),
            salary: String::new(),
        }
    }
}

impl SimulationForm {
    /// Checks the form in submission order.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.name.is_empty()
            || self.email.is_empty()
            || self.phone.is_empty()
            || self.cpf.is_empty()
        {
            return Err(SimulationError::MissingRequiredFields);
        }
        if self.plan.is_none() {
            return Err(SimulationError::PlanNotSelected);
        }
        if !quote::amount_in_range(self.amount) {
            return Err(SimulationError::AmountOutOfRange);
        }
        if !quote::amount_on_step(self.amount) {
            return Err(SimulationError::AmountOffStep);
        }
        Ok(())
    }

    /// Validates the form and builds the record to insert.
    ///
    /// The quote is computed here: flat interest total plus the undivided
    /// monthly payment for the chosen plan. Optional fields go out as the
    /// entered strings, blank salary is written as "0".
    pub fn to_application(&self) -> Result<LoanApplication, SimulationError> {
        self.validate()?;
        // validate() guarantees the plan is present
        let plan = self.plan.ok_or(SimulationError::PlanNotSelected)?;
        let total = quote::total_with_interest(self.amount);

        Ok(LoanApplication {
            requested_amount: Some(self.amount),
            installments_option: Some(plan),
            monthly_payment: Some(quote::monthly_payment(total, plan)),
            total_with_interest: Some(total),
            interest_rate: Some(quote::INTEREST_RATE),
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            phone: Some(self.phone.clone()),
            cpf: Some(self.cpf.clone()),
            address: Some(self.address.clone()),
            profession: Some(self.profession.clone()),
            salary: Some(if self.salary.is_empty() {
                "0".to_string()
            } else {
                self.salary.clone()
            }),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> SimulationForm {
        SimulationForm {
            amount: 1000.0,
            plan: Some(InstallmentPlan::Six),
            name: "Maria da Silva".to_string(),
            email: "maria@example.com".to_string(),
            phone: "11999990000".to_string(),
            cpf: "123.456.789-00".to_string(),
            address: String::new(),
            profession: String::new(),
            salary: String::new(),
        }
    }

    #[test]
    fn test_valid_form_builds_insert_fields() {
        let record = filled_form().to_application().unwrap();
        assert_eq!(record.requested_amount, Some(1000.0));
        assert_eq!(record.total_with_interest, Some(1300.0));
        assert_eq!(record.monthly_payment, Some(1300.0 / 6.0));
        assert_eq!(record.interest_rate, Some(0.30));
        assert_eq!(record.installments_option, Some(InstallmentPlan::Six));
        // Optional fields are written even when blank
        assert_eq!(record.address, Some(String::new()));
        assert_eq!(record.profession, Some(String::new()));
    }

    #[test]
    fn test_blank_salary_defaults_to_zero() {
        let record = filled_form().to_application().unwrap();
        assert_eq!(record.salary, Some("0".to_string()));

        let mut form = filled_form();
        form.salary = "3500".to_string();
        let record = form.to_application().unwrap();
        assert_eq!(record.salary, Some("3500".to_string()));
    }

    #[test]
    fn test_each_required_field_is_checked() {
        for field in ["name", "email", "phone", "cpf"] {
            let mut form = filled_form();
            match field {
                "name" => form.name.clear(),
                "email" => form.email.clear(),
                "phone" => form.phone.clear(),
                _ => form.cpf.clear(),
            }
            assert_eq!(form.validate(), Err(SimulationError::MissingRequiredFields));
        }
    }

    #[test]
    fn test_plan_must_be_selected() {
        let mut form = filled_form();
        form.plan = None;
        assert_eq!(form.validate(), Err(SimulationError::PlanNotSelected));
    }

    #[test]
    fn test_amount_bounds_and_step() {
        let mut form = filled_form();
        form.amount = 99.0;
        assert_eq!(form.validate(), Err(SimulationError::AmountOutOfRange));
        form.amount = 2600.0;
        assert_eq!(form.validate(), Err(SimulationError::AmountOutOfRange));
        form.amount = 1025.0;
        assert_eq!(form.validate(), Err(SimulationError::AmountOffStep));
    }

    #[test]
    fn test_required_fields_checked_before_plan() {
        let mut form = filled_form();
        form.name.clear();
        form.plan = None;
        assert_eq!(form.validate(), Err(SimulationError::MissingRequiredFields));
    }
}
