//! Configuration management.
//!
//! Loads configuration from environment variables with sensible dev defaults.

use thiserror::Error;

/// Longest accepted bearer-token lifetime (one year).
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),
}

/// Credentials for an account created at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedAccount {
    pub username: String,
    pub password: String,
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Socket address the HTTP server binds to.
    pub bind_addr: String,
    /// Absolute base used for hypermedia link hrefs.
    pub public_base_url: String,
    /// HS256 signing secret for bearer tokens.
    pub jwt_secret: String,
    /// Bearer token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Client credentials required by the password grant.
    pub oauth_client_id: String,
    pub oauth_client_secret: String,
    /// Bootstrap admin (ADMIN + USER).
    pub admin: SeedAccount,
    /// Bootstrap user (USER).
    pub user: SeedAccount,
    /// Use Postgres instead of in-memory repositories.
    pub use_persistent_stores: bool,
    pub database_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            jwt_secret: "dev-secret".to_string(),
            token_ttl_secs: 600,
            oauth_client_id: "myApp".to_string(),
            oauth_client_secret: "pass".to_string(),
            admin: SeedAccount {
                username: "admin@email.com".to_string(),
                password: "admin".to_string(),
            },
            user: SeedAccount {
                username: "user@email.com".to_string(),
                password: "user".to_string(),
            },
            use_persistent_stores: false,
            database_url: None,
        }
    }
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let jwt_secret = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                defaults.jwt_secret
            }
        };

        let token_ttl_secs = match lookup("TOKEN_TTL_SECS") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|ttl| (1..=MAX_TOKEN_TTL_SECS).contains(ttl))
                .ok_or(ConfigError::Invalid {
                    key: "TOKEN_TTL_SECS",
                    value: raw,
                })?,
            None => defaults.token_ttl_secs,
        };

        let use_persistent_stores = match lookup("USE_PERSISTENT_STORES") {
            Some(raw) => raw.parse::<bool>().map_err(|_| ConfigError::Invalid {
                key: "USE_PERSISTENT_STORES",
                value: raw,
            })?,
            None => false,
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        Ok(Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or(defaults.bind_addr),
            public_base_url: lookup("PUBLIC_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),
            jwt_secret,
            token_ttl_secs,
            oauth_client_id: lookup("OAUTH_CLIENT_ID").unwrap_or(defaults.oauth_client_id),
            oauth_client_secret: lookup("OAUTH_CLIENT_SECRET")
                .unwrap_or(defaults.oauth_client_secret),
            admin: SeedAccount {
                username: lookup("ADMIN_USERNAME").unwrap_or(defaults.admin.username),
                password: lookup("ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
            },
            user: SeedAccount {
                username: lookup("USER_USERNAME").unwrap_or(defaults.user.username),
                password: lookup("USER_PASSWORD").unwrap_or(defaults.user.password),
            },
            use_persistent_stores,
            database_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(load(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("JWT_SECRET", "s3cret"),
            ("TOKEN_TTL_SECS", "60"),
            ("PUBLIC_BASE_URL", "https://events.example.com/"),
            ("ADMIN_USERNAME", "root@example.com"),
        ])
        .unwrap();

        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.token_ttl_secs, 60);
        assert_eq!(config.public_base_url, "https://events.example.com");
        assert_eq!(config.admin.username, "root@example.com");
        assert_eq!(config.user, AppConfig::default().user);
    }

    #[test]
    fn invalid_numbers_and_flags_are_rejected() {
        assert!(matches!(
            load(&[("TOKEN_TTL_SECS", "soon")]),
            Err(ConfigError::Invalid { key: "TOKEN_TTL_SECS", .. })
        ));
        assert!(matches!(
            load(&[("TOKEN_TTL_SECS", "0")]),
            Err(ConfigError::Invalid { key: "TOKEN_TTL_SECS", .. })
        ));
        assert!(matches!(
            load(&[("TOKEN_TTL_SECS", "9223372036854775807")]),
            Err(ConfigError::Invalid { key: "TOKEN_TTL_SECS", .. })
        ));
        assert!(matches!(
            load(&[("TOKEN_TTL_SECS", "10000000000000")]),
            Err(ConfigError::Invalid { key: "TOKEN_TTL_SECS", .. })
        ));
        let ceiling = MAX_TOKEN_TTL_SECS.to_string();
        assert_eq!(
            load(&[("TOKEN_TTL_SECS", ceiling.as_str())]).unwrap().token_ttl_secs,
            MAX_TOKEN_TTL_SECS
        );
        assert!(matches!(
            load(&[("USE_PERSISTENT_STORES", "yes")]),
            Err(ConfigError::Invalid { key: "USE_PERSISTENT_STORES", .. })
        ));
    }

    #[test]
    fn persistent_stores_require_database_url() {
        assert_eq!(
            load(&[("USE_PERSISTENT_STORES", "true")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
        let config = load(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/eventdesk"),
        ])
        .unwrap();
        assert!(config.use_persistent_stores);
    }
}
