//! Service wiring: repositories, account service, token service.

use std::sync::Arc;

use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use eventdesk_auth::{Hs256TokenService, Sha256PasswordEncoder, TokenIssuer, TokenValidator};
use eventdesk_infra::{
    AccountError, AccountRepository, AccountService, AppConfig, EventRepository,
    InMemoryAccountRepository, InMemoryEventRepository, PostgresAccountRepository,
    PostgresEventRepository, RepositoryError, ensure_schema, seed_accounts,
};

use crate::app::hal::LinkBuilder;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,

    #[error("token lifetime out of range: {0}s")]
    InvalidTokenTtl(i64),

    #[error("database connection failed: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("seeding accounts failed: {0}")]
    Seed(#[from] AccountError),
}

/// Everything the handlers need, shared behind an `Arc`.
pub struct AppServices {
    pub events: Arc<dyn EventRepository>,
    pub accounts: AccountService,
    pub token_issuer: Arc<dyn TokenIssuer>,
    pub token_validator: Arc<dyn TokenValidator>,
    pub config: AppConfig,
    pub links: LinkBuilder,
}

impl AppServices {
    pub fn new<T>(
        events: Arc<dyn EventRepository>,
        accounts: AccountService,
        tokens: Arc<T>,
        config: AppConfig,
    ) -> Self
    where
        T: TokenIssuer + TokenValidator + 'static,
    {
        let links = LinkBuilder::new(config.public_base_url.clone());
        Self {
            events,
            accounts,
            token_issuer: tokens.clone(),
            token_validator: tokens,
            config,
            links,
        }
    }
}

/// Build services from configuration and seed the bootstrap accounts.
///
/// With `use_persistent_stores` the repositories are Postgres-backed and the
/// schema is created on first start; otherwise everything lives in memory.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StartupError> {
    let (events, accounts): (Arc<dyn EventRepository>, Arc<dyn AccountRepository>) =
        if config.use_persistent_stores {
            let url = config
                .database_url
                .as_deref()
                .ok_or(StartupError::MissingDatabaseUrl)?;
            let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
            ensure_schema(&pool).await?;
            tracing::info!("using Postgres repositories");
            (
                Arc::new(PostgresEventRepository::new(pool.clone())),
                Arc::new(PostgresAccountRepository::new(pool)),
            )
        } else {
            tracing::info!("using in-memory repositories");
            (
                Arc::new(InMemoryEventRepository::new()),
                Arc::new(InMemoryAccountRepository::new()),
            )
        };

    let account_service = AccountService::new(accounts, Arc::new(Sha256PasswordEncoder::new()));
    seed_accounts(&account_service, config).await?;

    let ttl = Duration::try_seconds(config.token_ttl_secs)
        .ok_or(StartupError::InvalidTokenTtl(config.token_ttl_secs))?;
    let tokens = Arc::new(Hs256TokenService::new(config.jwt_secret.as_bytes(), ttl));

    Ok(AppServices::new(events, account_service, tokens, config.clone()))
}
