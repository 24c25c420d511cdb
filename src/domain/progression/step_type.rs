//! Step-type catalog entries.
//!
//! The catalog is immutable reference data seeded by migration. At runtime it
//! is read-only: steps reference a catalog entry by id, and the evaluator
//! resolves pass criteria from the entry's name.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StepTypeId;

/// A row from the step-type catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTypeEntry {
    /// Catalog identifier referenced by `Step::step_type_id`.
    pub id: StepTypeId,
    /// Canonical name, e.g. `quizmaster_basic`.
    pub name: String,
    /// Whether completing a step of this type requires the user to link
    /// external credentials first.
    pub requires_credentials: bool,
}

impl StepTypeEntry {
    /// Resolves the catalog name into a known step-type, if recognized.
    pub fn kind(&self) -> Option<StepTypeName> {
        StepTypeName::parse(&self.name)
    }
}

/// The closed set of step types this service knows how to grade.
///
/// Catalog rows whose name does not parse into one of these variants are
/// treated as UNGRADED: a mandatory step of an unknown type blocks
/// progression rather than risk bypassing a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepTypeName {
    /// External credential verification (wallet, OAuth account, etc.).
    CredentialCheck,
    /// Admin-authored quiz graded against a fixed answer key.
    QuizmasterBasic,
    /// AI-graded free-form quiz.
    QuizmasterAi,
    /// Content the user acknowledges (no grading).
    Content,
    /// Optional side activity outside the main flow.
    Sidequest,
}

impl StepTypeName {
    /// Parses a catalog name. Unknown names return `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "credential_check" => Some(StepTypeName::CredentialCheck),
            "quizmaster_basic" => Some(StepTypeName::QuizmasterBasic),
            "quizmaster_ai" => Some(StepTypeName::QuizmasterAi),
            "content" => Some(StepTypeName::Content),
            "sidequest" => Some(StepTypeName::Sidequest),
            _ => None,
        }
    }

    /// Returns the canonical catalog name.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepTypeName::CredentialCheck => "credential_check",
            StepTypeName::QuizmasterBasic => "quizmaster_basic",
            StepTypeName::QuizmasterAi => "quizmaster_ai",
            StepTypeName::Content => "content",
            StepTypeName::Sidequest => "sidequest",
        }
    }

    /// Whether this type is a quiz variant.
    ///
    /// Quiz variants are the only types where completion alone is not
    /// enough: the recorded result must carry `passed == true`.
    pub fn is_quiz(&self) -> bool {
        matches!(self, StepTypeName::QuizmasterBasic | StepTypeName::QuizmasterAi)
    }
}

impl std::fmt::Display for StepTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognizes_all_catalog_names() {
        assert_eq!(
            StepTypeName::parse("credential_check"),
            Some(StepTypeName::CredentialCheck)
        );
        assert_eq!(
            StepTypeName::parse("quizmaster_basic"),
            Some(StepTypeName::QuizmasterBasic)
        );
        assert_eq!(
            StepTypeName::parse("quizmaster_ai"),
            Some(StepTypeName::QuizmasterAi)
        );
        assert_eq!(StepTypeName::parse("content"), Some(StepTypeName::Content));
        assert_eq!(StepTypeName::parse("sidequest"), Some(StepTypeName::Sidequest));
    }

    #[test]
    fn parse_returns_none_for_unknown_names() {
        assert_eq!(StepTypeName::parse("quizmaster_pro"), None);
        assert_eq!(StepTypeName::parse(""), None);
        assert_eq!(StepTypeName::parse("QUIZMASTER_BASIC"), None);
    }

    #[test]
    fn only_quiz_variants_are_quizzes() {
        assert!(StepTypeName::QuizmasterBasic.is_quiz());
        assert!(StepTypeName::QuizmasterAi.is_quiz());
        assert!(!StepTypeName::CredentialCheck.is_quiz());
        assert!(!StepTypeName::Content.is_quiz());
        assert!(!StepTypeName::Sidequest.is_quiz());
    }

    #[test]
    fn parse_and_as_str_roundtrip() {
        for name in ["credential_check", "quizmaster_basic", "quizmaster_ai", "content", "sidequest"] {
            assert_eq!(StepTypeName::parse(name).unwrap().as_str(), name);
        }
    }
}
