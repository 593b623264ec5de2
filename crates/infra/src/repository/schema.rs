//! Table definitions for the Postgres backend.

use sqlx::PgPool;

use super::RepositoryError;
use super::postgres::map_sqlx_error;

const CREATE_ACCOUNTS: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id UUID PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    roles TEXT NOT NULL
)
"#;

const CREATE_EVENTS: &str = r#"
CREATE TABLE IF NOT EXISTS events (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    begin_enrollment_date_time TIMESTAMP NULL,
    close_enrollment_date_time TIMESTAMP NULL,
    begin_event_date_time TIMESTAMP NULL,
    end_event_date_time TIMESTAMP NULL,
    location TEXT NULL,
    base_price INTEGER NOT NULL DEFAULT 0,
    max_price INTEGER NOT NULL DEFAULT 0,
    limit_of_enrollment INTEGER NOT NULL DEFAULT 0,
    offline BOOLEAN NOT NULL DEFAULT FALSE,
    free BOOLEAN NOT NULL DEFAULT FALSE,
    event_status TEXT NOT NULL DEFAULT 'DRAFT',
    manager_id UUID NULL REFERENCES accounts (id)
)
"#;

/// Create the `accounts` and `events` tables if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), RepositoryError> {
    for statement in [CREATE_ACCOUNTS, CREATE_EVENTS] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    tracing::info!("database schema ready");
    Ok(())
}
