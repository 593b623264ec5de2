//! `eventdesk-auth` — accounts, credentials and bearer tokens.
//!
//! This crate is intentionally decoupled from HTTP and storage: it knows how to
//! encode passwords, mint/verify tokens and decide ownership, but not where
//! accounts live or how requests arrive.

pub mod account;
pub mod authorize;
pub mod claims;
pub mod password;
pub mod roles;
pub mod token;

pub use account::Account;
pub use authorize::{authorize_manager, is_manager, AuthzError};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use password::{PasswordEncoder, PasswordError, Sha256PasswordEncoder};
pub use roles::AccountRole;
pub use token::{Hs256TokenService, IssuedToken, TokenError, TokenIssuer, TokenValidator};
