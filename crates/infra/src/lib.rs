//! Infrastructure layer: configuration, persistence, account services.

pub mod accounts;
pub mod config;
pub mod repository;
pub mod seed;

pub use accounts::{AccountError, AccountService};
pub use config::{AppConfig, ConfigError, MAX_TOKEN_TTL_SECS, SeedAccount};
pub use repository::schema::ensure_schema;
pub use repository::{
    AccountRepository, EventRepository, EventSortField, InMemoryAccountRepository,
    InMemoryEventRepository, PostgresAccountRepository, PostgresEventRepository, RepositoryError,
};
pub use seed::seed_accounts;
