//! Application layer for Presta.
//!
//! This crate provides the use cases that coordinate between the domain
//! and the infrastructure: the shared application session plus the three
//! wizard step services.

pub mod approval;
pub mod documents;
pub mod session;
pub mod simulation;

pub use approval::{ApprovalPhase, ApprovalStep, FixedDelayUnderwriter};
pub use documents::DocumentsStep;
pub use session::{LoanSession, ResumeOutcome, StepEntry};
pub use simulation::SimulationStep;
