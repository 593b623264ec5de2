use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

use eventdesk_core::{AccountId, Entity, EventId};

use crate::dto::EventDto;

/// Publication lifecycle of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventStatus {
    #[default]
    Draft,
    Published,
    BeganEnrollment,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "DRAFT",
            EventStatus::Published => "PUBLISHED",
            EventStatus::BeganEnrollment => "BEGAN_ENROLLMENT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "DRAFT" => Some(EventStatus::Draft),
            "PUBLISHED" => Some(EventStatus::Published),
            "BEGAN_ENROLLMENT" => Some(EventStatus::BeganEnrollment),
            _ => None,
        }
    }
}

/// Event resource.
///
/// # Invariants
/// - `free == (base_price == 0 && max_price == 0)`
/// - `offline == location is present and not blank`
///
/// Both flags are derived by [`Event::update`]; nothing else writes them.
/// Equality is identity equality (same `id`).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: String,
    pub begin_enrollment_date_time: Option<NaiveDateTime>,
    pub close_enrollment_date_time: Option<NaiveDateTime>,
    pub begin_event_date_time: Option<NaiveDateTime>,
    pub end_event_date_time: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub base_price: i32,
    pub max_price: i32,
    pub limit_of_enrollment: i32,
    pub offline: bool,
    pub free: bool,
    pub event_status: EventStatus,
    #[serde(serialize_with = "serialize_manager")]
    pub manager: Option<AccountId>,
}

impl Event {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            name: name.into(),
            description: description.into(),
            begin_enrollment_date_time: None,
            close_enrollment_date_time: None,
            begin_event_date_time: None,
            end_event_date_time: None,
            location: None,
            base_price: 0,
            max_price: 0,
            limit_of_enrollment: 0,
            offline: false,
            free: false,
            event_status: EventStatus::Draft,
            manager: None,
        }
    }

    /// Build a fresh draft from client input.
    ///
    /// Server-controlled state (id, status, manager, derived flags) never comes
    /// from the DTO. Call [`Event::update`] before persisting.
    pub fn from_dto(dto: &EventDto) -> Self {
        let mut event = Self::new(dto.name.clone(), dto.description.clone());
        event.apply_dto(dto);
        event
    }

    /// Overwrite the client-editable fields with the DTO's values.
    pub fn apply_dto(&mut self, dto: &EventDto) {
        self.name = dto.name.clone();
        self.description = dto.description.clone();
        self.begin_enrollment_date_time = dto.begin_enrollment_date_time;
        self.close_enrollment_date_time = dto.close_enrollment_date_time;
        self.begin_event_date_time = dto.begin_event_date_time;
        self.end_event_date_time = dto.end_event_date_time;
        self.location = dto.location.clone();
        self.base_price = dto.base_price;
        self.max_price = dto.max_price;
        self.limit_of_enrollment = dto.limit_of_enrollment;
    }

    /// Recompute the derived `free` and `offline` flags. Idempotent.
    pub fn update(&mut self) {
        self.free = self.base_price == 0 && self.max_price == 0;
        self.offline = self
            .location
            .as_deref()
            .is_some_and(|location| !location.trim().is_empty());
    }

    pub fn with_manager(mut self, manager: AccountId) -> Self {
        self.manager = Some(manager);
        self
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.same_identity_as(other)
    }
}

impl Eq for Event {}

impl Entity for Event {
    type Id = EventId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Managers are exposed by identity only: `{"id": "..."}`.
fn serialize_manager<S: Serializer>(manager: &Option<AccountId>, serializer: S) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct ManagerRef {
        id: AccountId,
    }

    match manager {
        Some(id) => ManagerRef { id: *id }.serialize(serializer),
        None => serializer.serialize_none(),
    }
}
