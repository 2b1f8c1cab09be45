//! Loan application domain model.
//!
//! The remote record store is the authority for this entity: identifiers and
//! creation timestamps are assigned there, never locally. Every field is
//! optional and skipped when unset so the same struct serves as the full row,
//! the insert payload, and a partial PATCH payload.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a loan application.
///
/// Transitions are monotonic: `Simulated` → `Approved` → `DocumentsSubmitted`.
/// The client only ever advances a record, never rolls it back.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Quote accepted, record created. Waiting for the approval decision.
    Simulated,
    /// Decision confirmed with a chosen installment plan.
    Approved,
    /// All documents and bank details submitted. Terminal state.
    DocumentsSubmitted,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simulated => write!(f, "simulated"),
            Self::Approved => write!(f, "approved"),
            Self::DocumentsSubmitted => write!(f, "documents_submitted"),
        }
    }
}

/// The four offered installment plans.
///
/// Serialized as the bare month count, which is how the record store column
/// holds it. Payment amounts are never derived from the position of a plan in
/// a list; they always travel next to their plan (see `decision::PlanQuote`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, strum::EnumIter)]
#[serde(try_from = "u32", into = "u32")]
pub enum InstallmentPlan {
    Three,
    Six,
    Nine,
    Twelve,
}

impl InstallmentPlan {
    /// Number of monthly installments for this plan.
    pub fn months(&self) -> u32 {
        match self {
            Self::Three => 3,
            Self::Six => 6,
            Self::Nine => 9,
            Self::Twelve => 12,
        }
    }
}

impl From<InstallmentPlan> for u32 {
    fn from(plan: InstallmentPlan) -> u32 {
        plan.months()
    }
}

impl TryFrom<u32> for InstallmentPlan {
    type Error = String;

    fn try_from(months: u32) -> std::result::Result<Self, Self::Error> {
        match months {
            3 => Ok(Self::Three),
            6 => Ok(Self::Six),
            9 => Ok(Self::Nine),
            12 => Ok(Self::Twelve),
            other => Err(format!("invalid installment count: {other}")),
        }
    }
}

impl std::fmt::Display for InstallmentPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.months())
    }
}

/// Bank account type, serialized with the record store's wire values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountType {
    #[serde(rename = "corrente")]
    Checking,
    #[serde(rename = "poupanca")]
    Savings,
}

impl AccountType {
    /// Human-readable label for menus and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Checking => "Checking (corrente)",
            Self::Savings => "Savings (poupanca)",
        }
    }
}

/// A loan application record.
///
/// Field names match the record store's column names. All fields are
/// `Option` and unset fields are omitted on the wire, so a value of this
/// type can describe anything from a freshly filled insert to a
/// three-field PATCH.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LoanApplication {
    /// Record identifier, assigned by the record store on insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Creation timestamp, assigned by the record store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,

    // ============================================================================
    // Quote (written by the simulation step)
    // ============================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requested_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installments_option: Option<InstallmentPlan>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_payment: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_with_interest: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,

    // ============================================================================
    // Applicant
    // ============================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profession: Option<String>,

    /// Free-text monthly income. Defaults to "0" when the applicant leaves
    /// it blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,

    // ============================================================================
    // Decision (written by the approval step)
    // ============================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,

    // ============================================================================
    // Document URLs (written by the documents step)
    // ============================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rg_front_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rg_back_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selfie_with_rg_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_residence_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_of_income_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selfie_url: Option<String>,

    // ============================================================================
    // Bank details (written by the documents step)
    // ============================================================================
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_agency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_account_type: Option<AccountType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
}

impl LoanApplication {
    /// First word of the applicant's name, for greetings.
    pub fn first_name(&self) -> Option<&str> {
        self.name.as_deref().and_then(|n| n.split_whitespace().next())
    }
}
