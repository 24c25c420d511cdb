//! Quota policy configuration
//!
//! The missing-row default per feature is deployment configuration, not a
//! hard-coded constant. The built-in defaults reproduce the documented
//! asymmetry: `active_wizard` fails closed, everything else fails open.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::entitlement::{Feature, LimitPolicy, QuotaPolicies};

use super::error::ValidationError;

/// Quota configuration section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct QuotaConfig {
    /// Per-feature missing-row policy overrides, keyed by feature name,
    /// e.g. `WAYPOST__QUOTA__POLICIES__IMAGE_GENERATION=fail_closed`.
    #[serde(default)]
    pub policies: HashMap<String, LimitPolicy>,
}

impl QuotaConfig {
    /// Resolves the effective policies: built-in defaults plus overrides.
    pub fn quota_policies(&self) -> QuotaPolicies {
        let mut policies = QuotaPolicies::with_defaults();
        for (name, policy) in &self.policies {
            if let Some(feature) = Feature::parse(name) {
                policies = policies.with_policy(feature, *policy);
            }
        }
        policies
    }

    /// Validate quota configuration: every override must name a known
    /// feature.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for name in self.policies.keys() {
            if Feature::parse(name).is_none() {
                return Err(ValidationError::UnknownQuotaFeature(name.clone()));
            }
        }
        Ok(())
    }
}
