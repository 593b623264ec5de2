//! Password encoding.
//!
//! Encoded form: `{sha256}<salt>$<digest>` where salt and digest are standard
//! base64. The `{id}` prefix names the scheme so stored hashes stay readable if
//! another scheme is added later.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

const SCHEME_PREFIX: &str = "{sha256}";
const SALT_LEN: usize = 16;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("unsupported password scheme")]
    UnsupportedScheme,

    #[error("malformed encoded password")]
    Malformed,
}

/// Encodes raw passwords and checks raw passwords against encoded ones.
pub trait PasswordEncoder: Send + Sync {
    fn encode(&self, raw: &str) -> String;

    /// `true` when `raw` encodes to `encoded`.
    ///
    /// A malformed or foreign-scheme `encoded` value never matches.
    fn matches(&self, raw: &str, encoded: &str) -> bool;
}

/// Salted SHA-256 encoder.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PasswordEncoder;

impl Sha256PasswordEncoder {
    pub fn new() -> Self {
        Self
    }

    fn digest(salt: &[u8], raw: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(raw.as_bytes());
        hasher.finalize().to_vec()
    }

    fn split(encoded: &str) -> Result<(Vec<u8>, Vec<u8>), PasswordError> {
        let body = encoded
            .strip_prefix(SCHEME_PREFIX)
            .ok_or(PasswordError::UnsupportedScheme)?;
        let (salt, digest) = body.split_once('$').ok_or(PasswordError::Malformed)?;
        let salt = STANDARD.decode(salt).map_err(|_| PasswordError::Malformed)?;
        let digest = STANDARD.decode(digest).map_err(|_| PasswordError::Malformed)?;
        Ok((salt, digest))
    }
}

impl PasswordEncoder for Sha256PasswordEncoder {
    fn encode(&self, raw: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        let digest = Self::digest(&salt, raw);
        format!(
            "{SCHEME_PREFIX}{}${}",
            STANDARD.encode(salt),
            STANDARD.encode(digest)
        )
    }

    fn matches(&self, raw: &str, encoded: &str) -> bool {
        match Self::split(encoded) {
            Ok((salt, expected)) => {
                let actual = Self::digest(&salt, raw);
                constant_time_eq::constant_time_eq(&actual, &expected)
            }
            Err(e) => {
                tracing::debug!("password check against unusable hash: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_password_matches_raw() {
        let encoder = Sha256PasswordEncoder::new();
        let encoded = encoder.encode("kessun");
        assert!(encoded.starts_with("{sha256}"));
        assert!(encoder.matches("kessun", &encoded));
        assert!(!encoder.matches("keesun", &encoded));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let encoder = Sha256PasswordEncoder::new();
        assert_ne!(encoder.encode("pw"), encoder.encode("pw"));
    }

    #[test]
    fn raw_or_foreign_values_never_match() {
        let encoder = Sha256PasswordEncoder::new();
        assert!(!encoder.matches("pw", "pw"));
        assert!(!encoder.matches("pw", "{bcrypt}abc"));
        assert!(!encoder.matches("pw", "{sha256}not-base64$also-not"));
    }
}
