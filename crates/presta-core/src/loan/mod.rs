//! Loan application domain module.
//!
//! Contains the loan application record model, its lifecycle status, the
//! installment plan and account type value objects, and the repository
//! trait for the remote record store.

mod model;
mod repository;

// Re-export public API
pub use model::{AccountType, ApplicationStatus, InstallmentPlan, LoanApplication};
pub use repository::ApplicationRepository;
