use eventdesk_auth::JwtClaims;
use eventdesk_core::AccountId;

/// Authenticated requester, derived from a verified bearer token.
///
/// Absent from the request extensions for anonymous calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    account_id: AccountId,
    email: String,
}

impl PrincipalContext {
    pub fn new(account_id: AccountId, email: impl Into<String>) -> Self {
        Self {
            account_id,
            email: email.into(),
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl From<JwtClaims> for PrincipalContext {
    fn from(claims: JwtClaims) -> Self {
        Self::new(claims.sub, claims.email)
    }
}
