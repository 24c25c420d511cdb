//! JWT implementation of the TokenVerifier port.
//!
//! Validates HS256-signed bearer tokens issued by the platform's identity
//! service and extracts the caller's `(user_id, community_id)` pair from
//! the claims. Signature, expiry, issuer, and audience are all enforced.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, CommunityId, UserId};
use crate::ports::TokenVerifier;

/// Claims this service consumes from the platform JWT.
#[derive(Debug, Deserialize)]
struct Claims {
    /// Subject: the user id issued by the identity provider.
    sub: String,
    /// The community (tenant) the token is scoped to.
    community: String,
    /// Whether the caller holds the community admin role.
    #[serde(default)]
    admin: bool,
}

/// JWT-backed implementation of the TokenVerifier port.
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    /// Creates a verifier from the auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_audience(&[&config.audience]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!("JWT validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let user_id =
            UserId::new(data.claims.sub).map_err(|_| AuthError::MissingClaim("sub"))?;
        let community_id: CommunityId = data
            .claims
            .community
            .parse()
            .map_err(|_| AuthError::MissingClaim("community"))?;

        Ok(AuthenticatedUser::new(
            user_id,
            community_id,
            data.claims.admin,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        community: String,
        admin: bool,
        iss: String,
        aud: String,
        exp: i64,
    }

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-at-least-32-bytes-long!!".to_string(),
            issuer: "https://id.test.example.com".to_string(),
            audience: "waypost".to_string(),
        }
    }

    fn sign(claims: &TestClaims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn valid_claims() -> TestClaims {
        TestClaims {
            sub: "user-123".to_string(),
            community: CommunityId::new().to_string(),
            admin: false,
            iss: "https://id.test.example.com".to_string(),
            aud: "waypost".to_string(),
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
        }
    }

    #[tokio::test]
    async fn valid_token_resolves_both_ids() {
        let cfg = config();
        let claims = valid_claims();
        let verifier = JwtTokenVerifier::new(&cfg);

        let user = verifier
            .verify(&sign(&claims, &cfg.jwt_secret))
            .await
            .unwrap();
        assert_eq!(user.user_id.as_str(), "user-123");
        assert_eq!(user.community_id.to_string(), claims.community);
        assert!(!user.is_admin);
    }

    #[tokio::test]
    async fn wrong_secret_is_invalid() {
        let cfg = config();
        let verifier = JwtTokenVerifier::new(&cfg);
        let token = sign(&valid_claims(), "a-completely-different-secret-value");

        let err = verifier.verify(&token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn expired_token_reports_expiry() {
        let cfg = config();
        let mut claims = valid_claims();
        claims.exp = (chrono::Utc::now() - chrono::Duration::hours(1)).timestamp();
        let verifier = JwtTokenVerifier::new(&cfg);

        let err = verifier
            .verify(&sign(&claims, &cfg.jwt_secret))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn malformed_community_claim_is_rejected() {
        let cfg = config();
        let mut claims = valid_claims();
        claims.community = "not-a-uuid".to_string();
        let verifier = JwtTokenVerifier::new(&cfg);

        let err = verifier
            .verify(&sign(&claims, &cfg.jwt_secret))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingClaim("community")));
    }
}
