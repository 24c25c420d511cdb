//! TokenVerifier port - bearer token validation.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Port for validating bearer tokens into an authenticated caller.
///
/// Keeps the HTTP middleware provider-agnostic: the JWT adapter, or a mock
/// for testing, both satisfy this trait.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Validates a raw bearer token and extracts the caller's identity.
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
