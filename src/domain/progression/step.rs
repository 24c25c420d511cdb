//! Step configuration owned by the authoring community.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RoleId, StepId, StepTypeId, WizardId};

use super::StepTypeName;

/// A single unit of work within a wizard.
///
/// Ordering is unique per wizard; the constraint is deferrable so that
/// reorders commit atomically (see `StepRepository::reorder`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    pub wizard_id: WizardId,
    pub step_type_id: StepTypeId,
    /// Position within the wizard, unique per wizard.
    pub position: i32,
    /// Mandatory steps must be PASSED for wizard completion; optional steps
    /// only need to be attempted.
    pub is_mandatory: bool,
    /// Role granted when this step contributes to a wizard completion.
    pub target_role_id: Option<RoleId>,
    pub is_active: bool,
}

/// The evaluator's view of a step: the mandatory flag from the step row
/// joined with the resolved catalog type.
///
/// `step_type` is `None` when the catalog entry is missing or its name is
/// unrecognized; for mandatory steps the evaluator treats that as ungraded
/// and blocks progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDefinition {
    pub is_mandatory: bool,
    pub step_type: Option<StepTypeName>,
}

impl StepDefinition {
    pub fn new(is_mandatory: bool, step_type: Option<StepTypeName>) -> Self {
        Self {
            is_mandatory,
            step_type,
        }
    }

    /// Builds the evaluator view from a step row and its (possibly missing)
    /// catalog entry.
    pub fn resolve(step: &Step, catalog_name: Option<&str>) -> Self {
        Self {
            is_mandatory: step.is_mandatory,
            step_type: catalog_name.and_then(StepTypeName::parse),
        }
    }
}
