//! Authentication types for the domain layer.
//!
//! These types represent an authenticated caller extracted from a JWT token.
//! They have **no external dependencies** - any auth provider can populate
//! them via the `TokenVerifier` port.
//!
//! # Design Decisions
//!
//! - `AuthenticatedUser` carries only the claims the evaluator and checker
//!   actually consume: the user id and the community (tenant) id
//! - Identity is passed EXPLICITLY into every evaluator/checker call; there
//!   is no ambient request context in the domain or application layers
//! - `AuthError` is domain-centric, not provider-specific

use super::{CommunityId, UserId};
use thiserror::Error;

/// Authenticated caller extracted from a validated JWT.
///
/// This is a **domain type** with no provider dependencies. The HTTP auth
/// middleware populates it via the `TokenVerifier` port and injects it into
/// request extensions; handlers then pass the ids on as explicit arguments.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the auth provider (`sub` claim).
    pub user_id: UserId,

    /// The community the caller is acting within (`community` claim).
    pub community_id: CommunityId,

    /// Whether the caller holds the community admin role.
    pub is_admin: bool,
}

impl AuthenticatedUser {
    /// Creates a new authenticated caller.
    ///
    /// This is typically called by the `TokenVerifier` adapter after
    /// successfully validating a JWT token.
    pub fn new(user_id: UserId, community_id: CommunityId, is_admin: bool) -> Self {
        Self {
            user_id,
            community_id,
            is_admin,
        }
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// The token is valid but lacks the claims this service requires.
    #[error("Missing required claim: {0}")]
    MissingClaim(&'static str),

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the caller should re-authenticate.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}
