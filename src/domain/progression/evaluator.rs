//! The step progression evaluator.
//!
//! `can_proceed` is the single source of truth for "may this user advance
//! past this step". It is a total, side-effect-free function over optional
//! inputs: both the progress record and the step definition may be absent,
//! and no input combination panics or errors.
//!
//! # Decision table (first match wins)
//!
//! | # | Condition | Result |
//! |---|-----------|--------|
//! | 1 | no progress record | `false` |
//! | 2 | step not mandatory (or definition unresolvable) | attempted? |
//! | 3 | mandatory, not attempted | `false` |
//! | 4 | mandatory, step type unknown | `false` |
//! | 5 | mandatory quiz variant | `verified_data.passed == true`? |
//! | 6 | mandatory, any other type, attempted | `true` |
//!
//! Rule 4 is a deliberate fail-safe: an unknown step type on a mandatory
//! step blocks progression. Do not "fix" it to default open - a missing
//! catalog row must never bypass a check.

use super::{quiz_passed, StepDefinition, UserStepProgress};

/// Decides whether the user may advance past a step.
///
/// `progress` is the user's progress row for the step, if any exists.
/// `definition` is the step's mandatory flag joined with its resolved
/// catalog type; `None` means the step row itself could not be resolved,
/// which grades like a non-mandatory step (mere attempt suffices).
pub fn can_proceed(
    progress: Option<&UserStepProgress>,
    definition: Option<&StepDefinition>,
) -> bool {
    // Rule 1: nothing attempted, nothing to grade.
    let Some(progress) = progress else {
        return false;
    };

    let attempted = progress.completed_at.is_some();

    // Rule 2: optional steps (and unresolvable step rows) pass on attempt
    // alone; correctness of the recorded result is irrelevant.
    let Some(definition) = definition else {
        return attempted;
    };
    if !definition.is_mandatory {
        return attempted;
    }

    // Rule 3: mandatory and never attempted.
    if !attempted {
        return false;
    }

    // Rule 4: mandatory with an unknown/missing catalog type. Fail closed.
    let Some(step_type) = definition.step_type else {
        return false;
    };

    // Rule 5: mandatory quizzes require a strict pass.
    if step_type.is_quiz() {
        return quiz_passed(progress.verified_data.as_ref());
    }

    // Rule 6: every other mandatory type passes once attempted.
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{StepId, Timestamp, UserId, WizardId};
    use crate::domain::progression::StepTypeName;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    fn progress(completed: bool, verified_data: Option<Value>) -> UserStepProgress {
        UserStepProgress {
            user_id: UserId::new("user-1").unwrap(),
            wizard_id: WizardId::new(),
            step_id: StepId::new(),
            completed_at: completed.then(Timestamp::now),
            verified_data,
        }
    }

    fn definition(is_mandatory: bool, step_type: Option<StepTypeName>) -> StepDefinition {
        StepDefinition::new(is_mandatory, step_type)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Rule 1: missing progress record
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn no_progress_record_blocks() {
        let def = definition(false, Some(StepTypeName::Content));
        assert!(!can_proceed(None, Some(&def)));
        assert!(!can_proceed(None, None));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Rule 2: non-mandatory steps
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn optional_step_passes_on_attempt_alone() {
        let def = definition(false, Some(StepTypeName::QuizmasterBasic));
        let attempted = progress(true, Some(json!({"passed": false})));

        // A failed quiz still "passes" an optional step.
        assert!(can_proceed(Some(&attempted), Some(&def)));
    }

    #[test]
    fn optional_step_blocks_without_attempt() {
        let def = definition(false, Some(StepTypeName::Content));
        let unattempted = progress(false, None);
        assert!(!can_proceed(Some(&unattempted), Some(&def)));
    }

    #[test]
    fn missing_definition_grades_like_optional() {
        let attempted = progress(true, None);
        let unattempted = progress(false, None);
        assert!(can_proceed(Some(&attempted), None));
        assert!(!can_proceed(Some(&unattempted), None));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Rules 3-4: mandatory gating
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn mandatory_step_blocks_without_attempt() {
        let def = definition(true, Some(StepTypeName::Content));
        let unattempted = progress(false, None);
        assert!(!can_proceed(Some(&unattempted), Some(&def)));
    }

    #[test]
    fn mandatory_step_with_unknown_type_blocks_even_when_attempted() {
        let def = definition(true, None);
        let attempted = progress(true, Some(json!({"passed": true})));

        // Fail-closed: a passing payload cannot rescue an ungraded type.
        assert!(!can_proceed(Some(&attempted), Some(&def)));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Rule 5: mandatory quizzes
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn mandatory_quiz_passes_with_strict_true() {
        let def = definition(true, Some(StepTypeName::QuizmasterBasic));
        let attempted = progress(true, Some(json!({"passed": true, "answers": [1, 2]})));
        assert!(can_proceed(Some(&attempted), Some(&def)));
    }

    #[test]
    fn mandatory_quiz_blocks_on_failed_attempt() {
        let def = definition(true, Some(StepTypeName::QuizmasterBasic));
        let attempted = progress(true, Some(json!({"passed": false, "answers": [1, 2]})));
        assert!(!can_proceed(Some(&attempted), Some(&def)));
    }

    #[test]
    fn mandatory_quiz_blocks_on_malformed_verified_data() {
        let def = definition(true, Some(StepTypeName::QuizmasterAi));
        for bad in [
            json!(null),
            json!("passed"),
            json!([true]),
            json!({"passed": "true"}),
            json!({"passed": 1}),
            json!({}),
        ] {
            let attempted = progress(true, Some(bad.clone()));
            assert!(
                !can_proceed(Some(&attempted), Some(&def)),
                "payload {} must not pass",
                bad
            );
        }
    }

    #[test]
    fn mandatory_quiz_blocks_on_missing_verified_data() {
        let def = definition(true, Some(StepTypeName::QuizmasterAi));
        let attempted = progress(true, None);
        assert!(!can_proceed(Some(&attempted), Some(&def)));
    }

    #[test]
    fn flipping_passed_flips_the_decision() {
        let def = definition(true, Some(StepTypeName::QuizmasterBasic));
        let passing = progress(true, Some(json!({"passed": true, "answers": ["a"]})));
        let failing = progress(true, Some(json!({"passed": false, "answers": ["a"]})));

        assert!(can_proceed(Some(&passing), Some(&def)));
        assert!(!can_proceed(Some(&failing), Some(&def)));
    }

    // ════════════════════════════════════════════════════════════════════════
    // Rule 6: mandatory non-quiz steps
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn mandatory_non_quiz_passes_once_attempted() {
        for step_type in [
            StepTypeName::CredentialCheck,
            StepTypeName::Content,
            StepTypeName::Sidequest,
        ] {
            let def = definition(true, Some(step_type));
            let attempted = progress(true, Some(json!({"passed": false})));
            assert!(
                can_proceed(Some(&attempted), Some(&def)),
                "{} should pass on attempt",
                step_type
            );
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Properties
    // ════════════════════════════════════════════════════════════════════════

    fn arb_verified_data() -> impl Strategy<Value = Option<Value>> {
        prop_oneof![
            Just(None),
            Just(Some(json!(null))),
            Just(Some(json!({"passed": true}))),
            Just(Some(json!({"passed": false}))),
            Just(Some(json!({"passed": "true"}))),
            Just(Some(json!({"answers": [1, 2, 3]}))),
            Just(Some(json!("garbage"))),
            Just(Some(json!(42))),
        ]
    }

    fn arb_step_type() -> impl Strategy<Value = Option<StepTypeName>> {
        prop_oneof![
            Just(None),
            Just(Some(StepTypeName::CredentialCheck)),
            Just(Some(StepTypeName::QuizmasterBasic)),
            Just(Some(StepTypeName::QuizmasterAi)),
            Just(Some(StepTypeName::Content)),
            Just(Some(StepTypeName::Sidequest)),
        ]
    }

    proptest! {
        /// Non-mandatory steps pass iff attempted, whatever the payload.
        #[test]
        fn optional_pass_is_exactly_attempted(
            attempted in any::<bool>(),
            data in arb_verified_data(),
            step_type in arb_step_type(),
        ) {
            let def = definition(false, step_type);
            let record = progress(attempted, data);
            prop_assert_eq!(can_proceed(Some(&record), Some(&def)), attempted);
        }

        /// Mandatory steps never pass without an attempt.
        #[test]
        fn mandatory_never_passes_unattempted(
            data in arb_verified_data(),
            step_type in arb_step_type(),
        ) {
            let def = definition(true, step_type);
            let record = progress(false, data);
            prop_assert!(!can_proceed(Some(&record), Some(&def)));
        }

        /// Unknown step types block mandatory steps regardless of payload.
        #[test]
        fn unknown_type_blocks_mandatory(
            attempted in any::<bool>(),
            data in arb_verified_data(),
        ) {
            let def = definition(true, None);
            let record = progress(attempted, data);
            prop_assert!(!can_proceed(Some(&record), Some(&def)));
        }
    }
}
