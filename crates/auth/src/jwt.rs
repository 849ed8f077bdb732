//! Signed access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use charity_database::{User, UserRole};

use crate::AuthError;

/// Claims carried by every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
    #[serde(default)]
    pub organization_id: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn has_role(&self, role: UserRole) -> bool {
        self.role == role
    }
}

/// HS256 token issuer and verifier sharing one secret.
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtManager {
    /// Fails when `ttl_seconds` does not fit a signed millisecond duration.
    pub fn new(secret: &str, ttl_seconds: u64) -> Result<Self, AuthError> {
        let ttl = i64::try_from(ttl_seconds)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or(AuthError::TokenLifetime(ttl_seconds))?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn issue(&self, user: &User, organization_id: Option<&str>) -> Result<String, AuthError> {
        self.issue_with_ttl(user, organization_id, self.ttl)
    }

    /// Issue a token with an explicit lifetime, which may be negative.
    pub fn issue_with_ttl(
        &self,
        user: &User,
        organization_id: Option<&str>,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            organization_id: organization_id.map(str::to_owned),
            iat: now,
            exp: now.saturating_add(ttl.num_seconds()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(AuthError::Token)
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use charity_config::MAX_TOKEN_TTL_SECONDS;

    fn user(role: UserRole) -> User {
        User {
            id: "user-1".into(),
            email: "someone@example.org".into(),
            name: "Someone".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now().to_rfc3339(),
            updated_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let jwt = JwtManager::new("test-secret", 3_600).unwrap();
        let token = jwt.issue(&user(UserRole::Organization), Some("org-1")).unwrap();

        let claims = jwt.verify(&token).unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.role, UserRole::Organization);
        assert_eq!(claims.organization_id.as_deref(), Some("org-1"));
        assert_eq!(claims.exp - claims.iat, 3_600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtManager::new("test-secret", 3_600).unwrap();
        let token = jwt
            .issue_with_ttl(&user(UserRole::Donor), None, Duration::hours(-2))
            .unwrap();

        assert!(matches!(jwt.verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtManager::new("first-secret", 3_600).unwrap();
        let verifier = JwtManager::new("second-secret", 3_600).unwrap();
        let token = issuer.issue(&user(UserRole::Admin), None).unwrap();

        assert!(verifier.verify(&token).is_err());
        assert!(verifier.verify("not.a.token").is_err());
    }

    #[test]
    fn test_oversized_lifetime_is_rejected() {
        for ttl in [i64::MAX as u64, 10_000_000_000_000_000, u64::MAX] {
            assert!(matches!(
                JwtManager::new("test-secret", ttl),
                Err(AuthError::TokenLifetime(value)) if value == ttl
            ));
        }
        assert!(JwtManager::new("test-secret", MAX_TOKEN_TTL_SECONDS).is_ok());
    }

    #[test]
    fn test_claims_use_camel_case() {
        let jwt = JwtManager::new("test-secret", 60).unwrap();
        let token = jwt.issue(&user(UserRole::Donor), None).unwrap();
        let claims = serde_json::to_value(jwt.verify(&token).unwrap()).unwrap();

        assert_eq!(claims["userId"], "user-1");
        assert_eq!(claims["role"], "DONOR");
        assert!(claims["organizationId"].is_null());
    }
}
