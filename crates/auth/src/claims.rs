use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use eventdesk_core::AccountId;

use crate::AccountRole;

/// Bearer-token claims (transport-agnostic).
///
/// Timestamps travel as the standard numeric `iat`/`exp` claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject: the authenticated account.
    pub sub: AccountId,

    /// Account email (username) at issue time.
    pub email: String,

    /// Roles granted to the account.
    pub roles: Vec<AccountRole>,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate token claims against `now`.
///
/// Signature verification happens before this, in the token service.
pub fn validate_claims(claims: &JwtClaims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn claims_at(issued_at: DateTime<Utc>, ttl: Duration) -> JwtClaims {
        JwtClaims {
            sub: AccountId::new(),
            email: "user@email.com".to_string(),
            roles: vec![AccountRole::User],
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    #[test]
    fn accepts_inside_window() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::minutes(10));
        assert_eq!(validate_claims(&claims, t0 + Duration::minutes(5)), Ok(()));
    }

    #[test]
    fn rejects_expired_and_future_tokens() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::minutes(10));
        assert_eq!(
            validate_claims(&claims, t0 + Duration::minutes(10)),
            Err(TokenValidationError::Expired)
        );
        assert_eq!(
            validate_claims(&claims, t0 - Duration::seconds(1)),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn rejects_inverted_window() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::zero());
        assert_eq!(
            validate_claims(&claims, t0),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn serializes_standard_time_claims() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let claims = claims_at(t0, Duration::minutes(10));
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["iat"], t0.timestamp());
        assert_eq!(value["exp"], (t0 + Duration::minutes(10)).timestamp());
        assert_eq!(value["roles"][0], "USER");
    }
}
