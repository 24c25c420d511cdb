//! Billing plan reference data.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::PlanId;

/// Service tier code.
///
/// Effectively a closed enumeration: the plans table holds 2-4 rows and new
/// tiers ship with code changes, not runtime inserts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanCode {
    /// Free tier - default for communities without a subscription.
    Free,
    /// Plus tier - raised feature limits.
    Plus,
    /// Pro tier - highest limits.
    Pro,
}

impl PlanCode {
    /// Parses a plans-table code value. Unknown codes return `None`.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "free" => Some(PlanCode::Free),
            "plus" => Some(PlanCode::Plus),
            "pro" => Some(PlanCode::Pro),
            _ => None,
        }
    }

    /// Returns the canonical code string.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanCode::Free => "free",
            PlanCode::Plus => "plus",
            PlanCode::Pro => "pro",
        }
    }

    /// Returns true if this is a paid tier.
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanCode::Free)
    }
}

impl std::fmt::Display for PlanCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A row from the plans reference table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub code: PlanCode,
    pub name: String,
    pub price_cents: i64,
    /// Price id at the payment provider; billing itself lives outside this
    /// service, the id is carried for the upgrade CTA only.
    pub stripe_price_id: Option<String>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_code_parses_known_codes() {
        assert_eq!(PlanCode::parse("free"), Some(PlanCode::Free));
        assert_eq!(PlanCode::parse("plus"), Some(PlanCode::Plus));
        assert_eq!(PlanCode::parse("pro"), Some(PlanCode::Pro));
    }

    #[test]
    fn plan_code_rejects_unknown_codes() {
        assert_eq!(PlanCode::parse("enterprise"), None);
        assert_eq!(PlanCode::parse("FREE"), None);
    }

    #[test]
    fn only_free_is_unpaid() {
        assert!(!PlanCode::Free.is_paid());
        assert!(PlanCode::Plus.is_paid());
        assert!(PlanCode::Pro.is_paid());
    }

    #[test]
    fn plan_code_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&PlanCode::Plus).unwrap(), "\"plus\"");
    }
}
