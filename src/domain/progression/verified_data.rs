//! Typed views over the opaque `verified_data` payload.
//!
//! `verified_data` arrives from step verifiers as untyped JSON. Before the
//! evaluator treats it as trusted input it is parsed into a tagged union
//! keyed by step-type: quiz variants carry a structured result, everything
//! else is an unconstrained map. Parsing is fail-closed throughout - a
//! malformed payload grades as "not passed", never as an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::StepTypeName;

/// Structured result recorded by the quiz step types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    /// The user's answers, in question order.
    #[serde(default)]
    pub answers: Vec<Value>,
    /// Aggregate score assigned by the grader, if any.
    #[serde(default)]
    pub total_score: Option<f64>,
    /// Whether the grader judged the attempt passing. Anything other than
    /// a literal `true` in the source payload grades as failed.
    #[serde(default)]
    pub passed: bool,
}

/// `verified_data` after boundary validation, keyed by step type.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifiedData {
    /// Quiz variants: structured result.
    Quiz(QuizResult),
    /// Every other step type: unconstrained payload, kept opaque.
    Other(Value),
}

impl VerifiedData {
    /// Parses a raw payload for the given step type.
    ///
    /// Fail-closed: quiz payloads that are not objects, or whose fields do
    /// not deserialize, become a default (failed) `QuizResult`.
    pub fn parse(step_type: StepTypeName, value: &Value) -> Self {
        if step_type.is_quiz() {
            let result = serde_json::from_value::<QuizResult>(value.clone())
                .unwrap_or_else(|_| QuizResult {
                    answers: Vec::new(),
                    total_score: None,
                    passed: false,
                });
            VerifiedData::Quiz(result)
        } else {
            VerifiedData::Other(value.clone())
        }
    }
}

/// Grades a raw quiz payload without constructing the full union.
///
/// Returns `true` iff `value` is a JSON object whose `passed` field is the
/// boolean `true`. Missing payloads, non-objects, missing fields, and
/// non-boolean `passed` values all grade as failed.
pub fn quiz_passed(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Object(fields)) => matches!(fields.get("passed"), Some(Value::Bool(true))),
        _ => false,
    }
}
