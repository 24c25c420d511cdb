//! Mock authentication adapter for testing.
//!
//! Implements the `TokenVerifier` port for use in tests, avoiding the need
//! for real signed tokens.
//!
//! # Example
//!
//! ```ignore
//! use waypost::adapters::auth::MockTokenVerifier;
//! use waypost::domain::foundation::{AuthenticatedUser, CommunityId, UserId};
//!
//! let verifier = MockTokenVerifier::new().with_user(
//!     "valid-token",
//!     AuthenticatedUser::new(
//!         UserId::new("user-123").unwrap(),
//!         CommunityId::new(),
//!         false,
//!     ),
//! );
//!
//! let result = verifier.verify("valid-token").await;
//! assert!(result.is_ok());
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, CommunityId, UserId};
use crate::ports::TokenVerifier;

/// Mock token verifier for testing.
///
/// Stores a map of tokens to callers. Tokens not in the map return
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockTokenVerifier {
    /// Map of valid tokens to their associated callers
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
    /// Optional error to return for all verifications (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockTokenVerifier {
    /// Creates a new empty mock verifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a caller.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Adds a valid token for a simple member of the given community.
    pub fn with_member(
        self,
        token: impl Into<String>,
        user_id: impl Into<String>,
        community_id: CommunityId,
    ) -> Self {
        let user = AuthenticatedUser::new(
            UserId::new(user_id.into()).unwrap(),
            community_id,
            false,
        );
        self.with_user(token, user)
    }

    /// Forces all verifications to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }
}

#[async_trait]
impl TokenVerifier for MockTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
