//! Plan limits and the missing-row default policy.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::PlanId;

use super::Feature;

/// The aggregation window a limit applies over.
///
/// `Instant` (stored as `time_window = 0`) is a ceiling on a CURRENT count -
/// "at most N simultaneously active" - not a rolling rate. `Trailing` limits
/// count usage events within the trailing window of the given length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u64", into = "u64")]
pub struct QuotaWindow {
    secs: u64,
}

impl QuotaWindow {
    /// The instantaneous window (`time_window = 0`).
    pub const INSTANT: QuotaWindow = QuotaWindow { secs: 0 };

    /// A trailing window of the given number of seconds.
    pub fn trailing_secs(secs: u64) -> Self {
        Self { secs }
    }

    /// A trailing window of the given number of days.
    pub fn trailing_days(days: u64) -> Self {
        Self {
            secs: days * 24 * 60 * 60,
        }
    }

    /// Whether this is the instantaneous "current count" window.
    pub fn is_instant(&self) -> bool {
        self.secs == 0
    }

    /// Window length in seconds (zero for instant).
    pub fn as_secs(&self) -> u64 {
        self.secs
    }

    /// Human-readable description for denial payloads.
    pub fn description(&self) -> String {
        if self.secs == 0 {
            return "current count".to_string();
        }
        let days = self.secs / 86_400;
        if days > 0 && self.secs % 86_400 == 0 {
            return format!("per {} day(s)", days);
        }
        let hours = self.secs / 3_600;
        if hours > 0 && self.secs % 3_600 == 0 {
            return format!("per {} hour(s)", hours);
        }
        format!("per {} second(s)", self.secs)
    }
}

impl From<u64> for QuotaWindow {
    fn from(secs: u64) -> Self {
        Self { secs }
    }
}

impl From<QuotaWindow> for u64 {
    fn from(window: QuotaWindow) -> Self {
        window.secs
    }
}

/// A row from the plan-limits table.
///
/// Composite key (plan_id, feature, window). `plan_id = None` is the
/// sentinel "no plan" state: limits that apply to communities without a
/// current plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanLimit {
    pub plan_id: Option<PlanId>,
    pub feature: Feature,
    pub window: QuotaWindow,
    pub hard_limit: i64,
}

/// What to do when no limit row matches `(plan_id, feature)`.
///
/// The defaults are asymmetric and the asymmetry is intentional, not to be
/// unified: `active_wizard` fails closed (missing row means a hard limit of
/// 0), every other feature fails open (missing row means unlimited). See
/// DESIGN.md for the flag on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Missing row means the feature is unlimited.
    FailOpen,
    /// Missing row means a hard limit of zero.
    FailClosed,
}

static DEFAULT_POLICIES: Lazy<HashMap<Feature, LimitPolicy>> = Lazy::new(|| {
    let mut policies = HashMap::new();
    policies.insert(Feature::ActiveWizard, LimitPolicy::FailClosed);
    policies.insert(Feature::AiChatMessage, LimitPolicy::FailOpen);
    policies.insert(Feature::ImageGeneration, LimitPolicy::FailOpen);
    policies
});

/// Per-feature missing-row policies.
///
/// Deployments may override individual features through configuration; the
/// defaults are the asymmetric pair described on [`LimitPolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaPolicies {
    policies: HashMap<Feature, LimitPolicy>,
}

impl QuotaPolicies {
    /// Policies with the documented per-feature defaults.
    pub fn with_defaults() -> Self {
        Self {
            policies: DEFAULT_POLICIES.clone(),
        }
    }

    /// Overrides the policy for one feature.
    pub fn with_policy(mut self, feature: Feature, policy: LimitPolicy) -> Self {
        self.policies.insert(feature, policy);
        self
    }

    /// The policy for a feature. Features absent from the map fail open,
    /// matching the generic default.
    pub fn policy_for(&self, feature: Feature) -> LimitPolicy {
        self.policies
            .get(&feature)
            .copied()
            .unwrap_or(LimitPolicy::FailOpen)
    }
}

impl Default for QuotaPolicies {
    fn default() -> Self {
        Self::with_defaults()
    }
}
