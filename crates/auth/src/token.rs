//! Bearer token issuing and verification (HS256 JWTs).

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use thiserror::Error;

use crate::{Account, JwtClaims, TokenValidationError, validate_claims};

/// Access token handed back by the password grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: String,
    /// Lifetime in seconds.
    pub expires_in: i64,
    pub scope: String,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token encoding failed: {0}")]
    Encode(String),

    #[error("invalid token: {0}")]
    Invalid(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Mints bearer tokens for authenticated accounts.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, account: &Account, now: DateTime<Utc>) -> Result<IssuedToken, TokenError>;
}

/// Verifies bearer tokens and yields their claims.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError>;
}

/// Symmetric-key token service: signs and verifies with the same secret.
#[derive(Clone)]
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256TokenService {
    pub const SCOPE: &'static str = "read write";

    pub fn new(secret: impl AsRef<[u8]>, ttl: Duration) -> Self {
        let secret = secret.as_ref();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    fn validation() -> Validation {
        // Time checks run in `validate_claims` against the caller's clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::from(["exp".to_string()]);
        validation
    }
}

impl core::fmt::Debug for Hs256TokenService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hs256TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer for Hs256TokenService {
    fn issue(&self, account: &Account, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let claims = JwtClaims {
            sub: account.id,
            email: account.email.clone(),
            roles: account.roles.iter().copied().collect(),
            issued_at: now,
            expires_at: now
                .checked_add_signed(self.ttl)
                .ok_or_else(|| TokenError::Encode("token expiry out of range".to_string()))?,
        };

        let access_token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))?;

        Ok(IssuedToken {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: self.ttl.num_seconds(),
            scope: Self::SCOPE.to_string(),
        })
    }
}

impl TokenValidator for Hs256TokenService {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, TokenError> {
        let data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding, &Self::validation())
            .map_err(|e| TokenError::Invalid(e.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AccountRole;

    fn service(secret: &str) -> Hs256TokenService {
        Hs256TokenService::new(secret, Duration::minutes(10))
    }

    #[test]
    fn issued_token_carries_account_identity() {
        let account = Account::new("admin@email.com", "x", [AccountRole::Admin, AccountRole::User]);
        let now = Utc::now();
        let tokens = service("test-secret");

        let issued = tokens.issue(&account, now).unwrap();
        assert_eq!(issued.token_type, "bearer");
        assert_eq!(issued.expires_in, 600);

        let claims = tokens.validate(&issued.access_token, now).unwrap();
        assert_eq!(claims.sub, account.id);
        assert_eq!(claims.email, "admin@email.com");
        assert_eq!(claims.roles, vec![AccountRole::Admin, AccountRole::User]);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let account = Account::new("user@email.com", "x", [AccountRole::User]);
        let now = Utc::now();
        let issued = service("secret-a").issue(&account, now).unwrap();

        let err = service("secret-b").validate(&issued.access_token, now).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let account = Account::new("user@email.com", "x", [AccountRole::User]);
        let now = Utc::now();
        let tokens = service("test-secret");
        let issued = tokens.issue(&account, now).unwrap();

        let err = tokens
            .validate(&issued.access_token, now + Duration::minutes(11))
            .unwrap_err();
        assert!(matches!(err, TokenError::Claims(TokenValidationError::Expired)));
    }

    #[test]
    fn expiry_beyond_the_calendar_is_an_error() {
        let account = Account::new("user@email.com", "x", [AccountRole::User]);
        let ttl = Duration::try_seconds(10_000_000_000_000).unwrap();
        let err = Hs256TokenService::new("test-secret", ttl)
            .issue(&account, Utc::now())
            .unwrap_err();
        assert!(matches!(err, TokenError::Encode(_)));
    }

    #[test]
    fn garbage_is_rejected() {
        let err = service("test-secret").validate("not.a.jwt", Utc::now()).unwrap_err();
        assert!(matches!(err, TokenError::Invalid(_)));
    }
}
