//! In-memory repositories for tests/dev.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use eventdesk_auth::Account;
use eventdesk_core::{AccountId, Direction, EventId, Page, Pageable};
use eventdesk_events::Event;

use super::{AccountRepository, EventRepository, EventSortField, RepositoryError};

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("lock poisoned".to_string())
}

/// In-memory event store. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    inner: RwLock<HashMap<EventId, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn compare(field: EventSortField, a: &Event, b: &Event) -> Ordering {
        let primary = match field {
            EventSortField::Id => Ordering::Equal,
            EventSortField::Name => a.name.cmp(&b.name),
            EventSortField::BeginEventDateTime => a.begin_event_date_time.cmp(&b.begin_event_date_time),
            EventSortField::BasePrice => a.base_price.cmp(&b.base_price),
        };
        // Ties broken by id so pages are stable.
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn save(&self, event: Event) -> Result<Event, RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }

    async fn find_all(&self, pageable: &Pageable) -> Result<Page<Event>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;

        let (field, direction) = EventSortField::from_pageable(pageable);
        let mut all: Vec<&Event> = map.values().collect();
        all.sort_by(|a, b| {
            let ord = Self::compare(field, a, b);
            match direction {
                Direction::Asc => ord,
                Direction::Desc => ord.reverse(),
            }
        });

        let total = all.len() as u64;
        let offset = usize::try_from(pageable.offset()).unwrap_or(usize::MAX);
        let content = all
            .into_iter()
            .skip(offset)
            .take(pageable.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, pageable, total))
    }
}

/// In-memory account store keyed by id, unique by email.
#[derive(Debug, Default)]
pub struct InMemoryAccountRepository {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountRepository for InMemoryAccountRepository {
    async fn save(&self, account: Account) -> Result<Account, RepositoryError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;

        let taken = map
            .values()
            .any(|existing| existing.email == account.email && existing.id != account.id);
        if taken {
            return Err(RepositoryError::Conflict(format!(
                "email already registered: {}",
                account.email
            )));
        }

        map.insert(account.id, account.clone());
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(&id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventdesk_auth::AccountRole;
    use eventdesk_core::Sort;

    fn event(name: &str, base_price: i32) -> Event {
        Event {
            base_price,
            ..Event::new(name, "test event")
        }
    }

    #[tokio::test]
    async fn save_then_find_by_id() {
        let repo = InMemoryEventRepository::new();
        let saved = repo.save(event("Spring", 0)).await.unwrap();

        let found = repo.find_by_id(saved.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Spring");
        assert!(repo.find_by_id(EventId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_replaces_existing_event() {
        let repo = InMemoryEventRepository::new();
        let mut saved = repo.save(event("Spring", 0)).await.unwrap();
        saved.name = "Renamed".to_string();
        repo.save(saved.clone()).await.unwrap();

        let page = repo.find_all(&Pageable::default()).await.unwrap();
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content[0].name, "Renamed");
    }

    #[tokio::test]
    async fn find_all_pages_in_id_order() {
        let repo = InMemoryEventRepository::new();
        let mut ids = Vec::new();
        for i in 0..30 {
            ids.push(repo.save(event(&format!("event {i}"), i)).await.unwrap().id);
        }
        ids.sort();

        let page = repo.find_all(&Pageable::new(Some(1), Some(10))).await.unwrap();
        assert_eq!(page.total_elements, 30);
        assert_eq!(page.total_pages(), 3);
        assert_eq!(page.content.len(), 10);
        assert_eq!(page.content[0].id, ids[10]);

        let beyond = repo.find_all(&Pageable::new(Some(5), Some(10))).await.unwrap();
        assert!(beyond.content.is_empty());
        assert_eq!(beyond.total_elements, 30);
    }

    #[tokio::test]
    async fn find_all_honours_sort() {
        let repo = InMemoryEventRepository::new();
        for (name, price) in [("b", 20), ("a", 30), ("c", 10)] {
            repo.save(event(name, price)).await.unwrap();
        }

        let by_name_desc = Pageable::default().with_sort(Sort::desc("name"));
        let names: Vec<_> = repo
            .find_all(&by_name_desc)
            .await
            .unwrap()
            .content
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["c", "b", "a"]);

        let by_price = Pageable::default().with_sort(Sort::asc("basePrice"));
        let prices: Vec<_> = repo
            .find_all(&by_price)
            .await
            .unwrap()
            .content
            .into_iter()
            .map(|e| e.base_price)
            .collect();
        assert_eq!(prices, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn account_emails_are_unique() {
        let repo = InMemoryAccountRepository::new();
        let first = Account::new("dup@email.com", "x", [AccountRole::User]);
        repo.save(first.clone()).await.unwrap();

        // Re-saving the same account is fine.
        repo.save(first.clone()).await.unwrap();

        let second = Account::new("dup@email.com", "y", [AccountRole::User]);
        let err = repo.save(second).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let found = repo.find_by_email("dup@email.com").await.unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(repo.find_by_id(first.id).await.unwrap().unwrap().email, "dup@email.com");
    }
}
