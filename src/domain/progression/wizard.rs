//! Wizard configuration and completion records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CommunityId, Timestamp, UserId, WizardId};

/// An ordered sequence of steps an end-user completes to earn roles.
///
/// Owned exclusively by the authoring community; `is_active` gates both
/// end-user visibility and the `active_wizard` quota count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wizard {
    pub id: WizardId,
    pub community_id: CommunityId,
    pub name: String,
    pub is_active: bool,
}

/// Record of a user completing a wizard.
///
/// Upserted on completion; `version` increments on re-completion so that
/// downstream role-grant consumers can distinguish runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardCompletion {
    pub user_id: UserId,
    pub wizard_id: WizardId,
    pub completed_at: Timestamp,
    pub version: i32,
}

impl WizardCompletion {
    /// First completion of a wizard by a user.
    pub fn first(user_id: UserId, wizard_id: WizardId, completed_at: Timestamp) -> Self {
        Self {
            user_id,
            wizard_id,
            completed_at,
            version: 1,
        }
    }

    /// Returns the record for a re-completion at `completed_at`.
    pub fn recompleted(&self, completed_at: Timestamp) -> Self {
        Self {
            user_id: self.user_id.clone(),
            wizard_id: self.wizard_id,
            completed_at,
            version: self.version + 1,
        }
    }
}
