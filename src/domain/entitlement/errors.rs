//! Entitlement-specific error types.
//!
//! Quota exhaustion is NOT an error: it is a first-class denial carried by
//! `QuotaDecision`. This enum covers the genuinely exceptional paths.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | UnknownFeature | 400 |
//! | CommunityNotFound | 404 |
//! | Infrastructure | 500 |

use crate::domain::foundation::CommunityId;

/// Entitlement-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntitlementError {
    /// The requested feature identifier is not in the closed feature set.
    UnknownFeature(String),

    /// The community does not exist.
    CommunityNotFound(CommunityId),

    /// Infrastructure error.
    Infrastructure(String),
}

impl EntitlementError {
    pub fn unknown_feature(name: impl Into<String>) -> Self {
        EntitlementError::UnknownFeature(name.into())
    }

    pub fn community_not_found(id: CommunityId) -> Self {
        EntitlementError::CommunityNotFound(id)
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        EntitlementError::Infrastructure(message.into())
    }
}

impl std::fmt::Display for EntitlementError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntitlementError::UnknownFeature(name) => {
                write!(f, "Unknown feature '{}'", name)
            }
            EntitlementError::CommunityNotFound(id) => {
                write!(f, "Community {} not found", id)
            }
            EntitlementError::Infrastructure(message) => {
                write!(f, "Infrastructure error: {}", message)
            }
        }
    }
}

impl std::error::Error for EntitlementError {}
