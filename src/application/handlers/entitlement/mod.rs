//! Entitlement handlers.
//!
//! ## Commands
//! - Consuming one unit of a feature's quota (atomic check-and-record)
//!
//! ## Queries
//! - Pure quota check (read-only)

mod check_quota;
mod consume_quota;

// Commands
pub use consume_quota::{ConsumeQuotaCommand, ConsumeQuotaHandler};

// Queries
pub use check_quota::{CheckQuotaHandler, CheckQuotaQuery};
