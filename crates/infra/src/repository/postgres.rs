//! Postgres-backed repositories.
//!
//! ## Error Mapping
//!
//! | SQLx error | Postgres code | `RepositoryError` |
//! |------------|---------------|-------------------|
//! | Database (unique violation) | `23505` | `Conflict` |
//! | Database (foreign key violation) | `23503` | `Conflict` |
//! | Anything else | n/a | `Storage` |

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Row};

use eventdesk_auth::{Account, AccountRole};
use eventdesk_core::{AccountId, Direction, EventId, Page, Pageable};
use eventdesk_events::{Event, EventStatus};

use super::{AccountRepository, EventRepository, EventSortField, RepositoryError};

const EVENT_COLUMNS: &str = r#"
    id, name, description,
    begin_enrollment_date_time, close_enrollment_date_time,
    begin_event_date_time, end_event_date_time,
    location, base_price, max_price, limit_of_enrollment,
    offline, free, event_status, manager_id
"#;

pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") | Some("23503") => RepositoryError::Conflict(msg),
                _ => RepositoryError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Storage(format!("connection pool closed in {}", operation))
        }
        _ => RepositoryError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}

struct EventRow {
    id: uuid::Uuid,
    name: String,
    description: String,
    begin_enrollment_date_time: Option<NaiveDateTime>,
    close_enrollment_date_time: Option<NaiveDateTime>,
    begin_event_date_time: Option<NaiveDateTime>,
    end_event_date_time: Option<NaiveDateTime>,
    location: Option<String>,
    base_price: i32,
    max_price: i32,
    limit_of_enrollment: i32,
    offline: bool,
    free: bool,
    event_status: String,
    manager_id: Option<uuid::Uuid>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for EventRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(EventRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            begin_enrollment_date_time: row.try_get("begin_enrollment_date_time")?,
            close_enrollment_date_time: row.try_get("close_enrollment_date_time")?,
            begin_event_date_time: row.try_get("begin_event_date_time")?,
            end_event_date_time: row.try_get("end_event_date_time")?,
            location: row.try_get("location")?,
            base_price: row.try_get("base_price")?,
            max_price: row.try_get("max_price")?,
            limit_of_enrollment: row.try_get("limit_of_enrollment")?,
            offline: row.try_get("offline")?,
            free: row.try_get("free")?,
            event_status: row.try_get("event_status")?,
            manager_id: row.try_get("manager_id")?,
        })
    }
}

impl TryFrom<EventRow> for Event {
    type Error = RepositoryError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let event_status = EventStatus::parse(&row.event_status).ok_or_else(|| {
            RepositoryError::Storage(format!("unknown event status '{}'", row.event_status))
        })?;

        Ok(Event {
            id: EventId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            begin_enrollment_date_time: row.begin_enrollment_date_time,
            close_enrollment_date_time: row.close_enrollment_date_time,
            begin_event_date_time: row.begin_event_date_time,
            end_event_date_time: row.end_event_date_time,
            location: row.location,
            base_price: row.base_price,
            max_price: row.max_price,
            limit_of_enrollment: row.limit_of_enrollment,
            offline: row.offline,
            free: row.free,
            event_status,
            manager: row.manager_id.map(AccountId::from_uuid),
        })
    }
}

/// Postgres-backed event repository.
#[derive(Clone)]
pub struct PostgresEventRepository {
    pool: PgPool,
}

impl PostgresEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepository {
    async fn save(&self, event: Event) -> Result<Event, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO events (
                id, name, description,
                begin_enrollment_date_time, close_enrollment_date_time,
                begin_event_date_time, end_event_date_time,
                location, base_price, max_price, limit_of_enrollment,
                offline, free, event_status, manager_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                begin_enrollment_date_time = EXCLUDED.begin_enrollment_date_time,
                close_enrollment_date_time = EXCLUDED.close_enrollment_date_time,
                begin_event_date_time = EXCLUDED.begin_event_date_time,
                end_event_date_time = EXCLUDED.end_event_date_time,
                location = EXCLUDED.location,
                base_price = EXCLUDED.base_price,
                max_price = EXCLUDED.max_price,
                limit_of_enrollment = EXCLUDED.limit_of_enrollment,
                offline = EXCLUDED.offline,
                free = EXCLUDED.free,
                event_status = EXCLUDED.event_status,
                manager_id = EXCLUDED.manager_id
            "#,
        )
        .bind(event.id.as_uuid())
        .bind(&event.name)
        .bind(&event.description)
        .bind(event.begin_enrollment_date_time)
        .bind(event.close_enrollment_date_time)
        .bind(event.begin_event_date_time)
        .bind(event.end_event_date_time)
        .bind(&event.location)
        .bind(event.base_price)
        .bind(event.max_price)
        .bind(event.limit_of_enrollment)
        .bind(event.offline)
        .bind(event.free)
        .bind(event.event_status.as_str())
        .bind(event.manager.map(|m| *m.as_uuid()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_event", e))?;

        Ok(event)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_event", e))?;

        row.map(Event::try_from).transpose()
    }

    async fn find_all(&self, pageable: &Pageable) -> Result<Page<Event>, RepositoryError> {
        let (field, direction) = EventSortField::from_pageable(pageable);
        let dir = match direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        // Column names come from a fixed whitelist, never from the request.
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY {} {dir}, id {dir} LIMIT $1 OFFSET $2",
            field.column()
        );

        let offset = i64::try_from(pageable.offset()).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(i64::from(pageable.size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_events", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_events", e))?;

        let content = rows
            .into_iter()
            .map(Event::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(content, pageable, u64::try_from(total).unwrap_or(0)))
    }
}

fn encode_roles(roles: &BTreeSet<AccountRole>) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn decode_roles(raw: &str) -> Result<BTreeSet<AccountRole>, RepositoryError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<AccountRole>().map_err(RepositoryError::Storage))
        .collect()
}

fn account_from_row(row: &sqlx::postgres::PgRow) -> Result<Account, RepositoryError> {
    let read = |e: sqlx::Error| map_sqlx_error("read_account", e);
    let id: uuid::Uuid = row.try_get("id").map_err(read)?;
    let roles: String = row.try_get("roles").map_err(read)?;

    Ok(Account {
        id: AccountId::from_uuid(id),
        email: row.try_get("email").map_err(read)?,
        password: row.try_get("password").map_err(read)?,
        roles: decode_roles(&roles)?,
    })
}

/// Postgres-backed account repository.
#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn save(&self, account: Account) -> Result<Account, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO accounts (id, email, password, roles)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                password = EXCLUDED.password,
                roles = EXCLUDED.roles
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(&account.email)
        .bind(&account.password)
        .bind(encode_roles(&account.roles))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_account", e))?;

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query("SELECT id, email, password, roles FROM accounts WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_account_by_email", e))?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let row = sqlx::query("SELECT id, email, password, roles FROM accounts WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_account_by_id", e))?;

        row.as_ref().map(account_from_row).transpose()
    }
}
