//! Wizard progression HTTP adapter.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    CompleteStepRequest, CompleteStepResponse, CompleteWizardResponse, ErrorResponse,
    ReorderStepsRequest, ReorderStepsResponse, StepOrderEntry, StepStatusResponse,
};
pub use handlers::WizardAppState;
pub use routes::{wizard_router, wizard_routes};
