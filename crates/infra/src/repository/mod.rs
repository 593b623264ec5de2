//! Persistence boundary for events and accounts.
//!
//! Handlers and services only see these traits; the backend (in-memory or
//! Postgres) is picked once at startup.

pub mod in_memory;
pub mod postgres;
pub mod schema;

use async_trait::async_trait;
use thiserror::Error;

use eventdesk_auth::Account;
use eventdesk_core::{AccountId, Direction, EventId, Page, Pageable};
use eventdesk_events::Event;

pub use in_memory::{InMemoryAccountRepository, InMemoryEventRepository};
pub use postgres::{PostgresAccountRepository, PostgresEventRepository};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Event persistence.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Insert or replace by id; returns the stored event.
    async fn save(&self, event: Event) -> Result<Event, RepositoryError>;

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError>;

    async fn find_all(&self, pageable: &Pageable) -> Result<Page<Event>, RepositoryError>;
}

/// Account persistence. Emails are unique.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert or replace by id; `Conflict` when another account owns the email.
    async fn save(&self, account: Account) -> Result<Account, RepositoryError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;
}

/// Properties events can be listed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventSortField {
    #[default]
    Id,
    Name,
    BeginEventDateTime,
    BasePrice,
}

impl EventSortField {
    pub fn parse(property: &str) -> Option<Self> {
        match property {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "beginEventDateTime" => Some(Self::BeginEventDateTime),
            "basePrice" => Some(Self::BasePrice),
            _ => None,
        }
    }

    /// Sort requested by `pageable`; unknown properties fall back to `id` ascending.
    pub fn from_pageable(pageable: &Pageable) -> (Self, Direction) {
        match &pageable.sort {
            Some(sort) => match Self::parse(&sort.property) {
                Some(field) => (field, sort.direction),
                None => {
                    tracing::debug!(property = %sort.property, "unsupported sort property; using id");
                    (Self::Id, Direction::Asc)
                }
            },
            None => (Self::Id, Direction::Asc),
        }
    }

    pub(crate) fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::BeginEventDateTime => "begin_event_date_time",
            Self::BasePrice => "base_price",
        }
    }
}
