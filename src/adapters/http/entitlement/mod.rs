//! Entitlement HTTP adapter.

mod dto;
mod handlers;
mod routes;

pub use dto::{ErrorResponse, QuotaDecisionResponse};
pub use handlers::EntitlementAppState;
pub use routes::{entitlement_router, entitlement_routes};
