pub mod bank;
pub mod config;
pub mod decision;
pub mod document;
pub mod documents_form;
pub mod error;
pub mod loan;
pub mod notice;
pub mod quote;
pub mod schedule;
pub mod session;
pub mod simulation;

// Re-export common error type
pub use error::PrestaError;
