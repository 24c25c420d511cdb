//! Entitlement domain - plans, limits, and quota decisions.
//!
//! # Module Organization
//!
//! - `plan` - Billing plan reference data (closed tier enumeration)
//! - `feature` - The closed set of quota-gated features
//! - `limit` - Plan limits, windows, and the missing-row default policy
//! - `quota` - The pure quota decision and usage events
//! - `errors` - Entitlement error taxonomy

mod errors;
mod feature;
mod limit;
mod plan;
mod quota;

pub use errors::EntitlementError;
pub use feature::Feature;
pub use limit::{LimitPolicy, PlanLimit, QuotaPolicies, QuotaWindow};
pub use plan::{Plan, PlanCode};
pub use quota::{evaluate_quota, QuotaDecision, UsageEvent};
