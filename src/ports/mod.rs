//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Progression Ports
//!
//! - `StepRepository` - Step configuration and atomic reorder
//! - `StepTypeReader` - Immutable step-type catalog
//! - `ProgressRepository` - Per-user step progress upserts
//! - `WizardRepository` - Wizard rows and completion records
//!
//! ## Entitlement Ports
//!
//! - `PlanReader` - Current plan and plan-limit rows
//! - `UsageStore` - Usage aggregation and atomic consumption
//!
//! ## Auth Ports
//!
//! - `TokenVerifier` - Bearer token validation

mod plan_reader;
mod progress_repository;
mod step_repository;
mod step_type_reader;
mod token_verifier;
mod usage_store;
mod wizard_repository;

pub use plan_reader::PlanReader;
pub use progress_repository::ProgressRepository;
pub use step_repository::StepRepository;
pub use step_type_reader::StepTypeReader;
pub use token_verifier::TokenVerifier;
pub use usage_store::{ConsumeOutcome, UsageStore};
pub use wizard_repository::WizardRepository;
