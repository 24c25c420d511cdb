//! Wizard-level completion evaluation.
//!
//! A wizard is completable only when every ACTIVE, MANDATORY step under it
//! independently satisfies `can_proceed`. The check is pure: callers load
//! the steps (joined with their catalog types) and the user's progress rows,
//! and persist a completion record only on a `Completable` outcome.

use std::collections::{BTreeSet, HashMap};

use crate::domain::foundation::{RoleId, StepId};

use super::{can_proceed, Step, StepDefinition, StepTypeName, UserStepProgress};

/// A step joined with its resolved catalog type.
///
/// `step_type` is `None` when the catalog row is missing or unrecognized;
/// the evaluator's fail-closed rule then applies to mandatory steps.
#[derive(Debug, Clone)]
pub struct CatalogedStep {
    pub step: Step,
    pub step_type: Option<StepTypeName>,
}

impl CatalogedStep {
    pub fn new(step: Step, step_type: Option<StepTypeName>) -> Self {
        Self { step, step_type }
    }

    fn definition(&self) -> StepDefinition {
        StepDefinition::new(self.step.is_mandatory, self.step_type)
    }
}

/// Outcome of evaluating a wizard for completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Every active mandatory step passes. `granted_roles` is the
    /// deduplicated union of `target_role_id` values from active steps the
    /// user has passed (order-irrelevant, returned sorted for determinism).
    Completable { granted_roles: Vec<RoleId> },
    /// At least one active mandatory step does not pass. Contains exactly
    /// the offending step ids; the caller must perform no state change.
    Blocked { failing_step_ids: Vec<StepId> },
}

impl CompletionOutcome {
    pub fn is_completable(&self) -> bool {
        matches!(self, CompletionOutcome::Completable { .. })
    }
}

/// Evaluates whether a wizard is completable for a user.
///
/// `steps` is every step configured under the wizard; inactive steps are
/// ignored entirely (they neither block nor grant). `progress` is the
/// user's progress rows for the wizard, keyed by step.
pub fn evaluate_completion(
    steps: &[CatalogedStep],
    progress: &HashMap<StepId, UserStepProgress>,
) -> CompletionOutcome {
    let mut failing: Vec<StepId> = Vec::new();
    let mut granted: BTreeSet<RoleId> = BTreeSet::new();

    for cataloged in steps.iter().filter(|c| c.step.is_active) {
        let record = progress.get(&cataloged.step.id);
        let passes = can_proceed(record, Some(&cataloged.definition()));

        if cataloged.step.is_mandatory && !passes {
            failing.push(cataloged.step.id);
        }
        if passes {
            if let Some(role) = cataloged.step.target_role_id {
                granted.insert(role);
            }
        }
    }

    if failing.is_empty() {
        CompletionOutcome::Completable {
            granted_roles: granted.into_iter().collect(),
        }
    } else {
        failing.sort();
        CompletionOutcome::Blocked {
            failing_step_ids: failing,
        }
    }
}
