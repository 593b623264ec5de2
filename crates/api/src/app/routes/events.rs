use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use eventdesk_auth::{authorize_manager, is_manager};
use eventdesk_core::{EventId, Pageable, Sort};
use eventdesk_events::{check_event_dto, Event, EventDto};

use crate::app::errors::ApiError;
use crate::app::hal::{EntityModel, Hal, Links, PageMetadata, PagedModel};
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

type EventModel = EntityModel<Event>;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:id", get(get_event).put(update_event))
}

/// `?page=&size=&sort=` as sent by clients. Unparseable values fall back to defaults.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

impl PageParams {
    pub fn to_pageable(&self) -> Pageable {
        let page = self.page.as_deref().and_then(|p| p.trim().parse().ok());
        let size = self.size.as_deref().and_then(|s| s.trim().parse().ok());
        let pageable = Pageable::new(page, size);
        match self.sort.as_deref().and_then(Sort::parse) {
            Some(sort) => pageable.with_sort(sort),
            None => pageable,
        }
    }
}

fn require_principal(
    principal: Option<Extension<PrincipalContext>>,
) -> Result<PrincipalContext, ApiError> {
    principal.map(|Extension(p)| p).ok_or(ApiError::Unauthorized)
}

fn read_body(body: Result<Json<EventDto>, JsonRejection>) -> Result<EventDto, ApiError> {
    body.map(|Json(dto)| dto)
        .map_err(|rejection| ApiError::from_json_rejection(EventDto::OBJECT_NAME, rejection))
}

/// Ids that do not parse cannot name an existing event.
fn parse_id(raw: &str) -> Result<EventId, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

pub async fn create_event(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    body: Result<Json<EventDto>, JsonRejection>,
) -> Result<Hal<EventModel>, ApiError> {
    let principal = require_principal(principal)?;
    let dto = read_body(body)?;
    check_event_dto(&dto)?;

    let mut event = Event::from_dto(&dto).with_manager(principal.account_id());
    event.update();
    let event = services.events.save(event).await?;

    tracing::info!(event_id = %event.id, manager = %principal.email(), "event created");

    let links = &services.links;
    let self_href = links.event(event.id);
    let model = EntityModel::new(
        event,
        Links::new()
            .with("self", self_href.clone())
            .with("query-events", links.events())
            .with("update-event", self_href.clone())
            .with("profile", links.profile("resources-events-create")),
    );

    Ok(Hal::created(self_href, model))
}

pub async fn list_events(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    Query(params): Query<PageParams>,
) -> Result<Hal<PagedModel<EventModel>>, ApiError> {
    let pageable = params.to_pageable();
    let page = services.events.find_all(&pageable).await?;
    let links = &services.links;

    let mut page_links = Links::new()
        .with("self", links.events_page(&pageable))
        .with("profile", links.profile("resources-events-list"));
    if !(page.is_first() && page.is_last()) {
        page_links.push("first", links.events_page(&pageable.at_page(0)));
        let last = page.total_pages().saturating_sub(1);
        page_links.push("last", links.events_page(&pageable.at_page(last)));
    }
    if page.has_previous() {
        page_links.push("prev", links.events_page(&pageable.at_page(page.number - 1)));
    }
    if page.has_next() {
        page_links.push("next", links.events_page(&pageable.at_page(page.number + 1)));
    }
    if principal.is_some() {
        page_links.push("create-event", links.events());
    }

    let metadata = PageMetadata::from(&page);
    let items = page
        .content
        .into_iter()
        .map(|event| {
            let href = links.event(event.id);
            EntityModel::new(event, Links::new().with("self", href))
        })
        .collect();

    Ok(Hal::ok(PagedModel::new("eventList", items, page_links, metadata)))
}

pub async fn get_event(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    Path(id): Path<String>,
) -> Result<Hal<EventModel>, ApiError> {
    let id = parse_id(&id)?;
    let event = services.events.find_by_id(id).await?.ok_or(ApiError::NotFound)?;

    let links = &services.links;
    let mut event_links = Links::new()
        .with("self", links.event(event.id))
        .with("profile", links.profile("resources-events-get"));

    let requester = principal.map(|Extension(p)| p.account_id());
    if is_manager(requester, event.manager) {
        event_links.push("update-event", links.event(event.id));
    }

    Ok(Hal::ok(EntityModel::new(event, event_links)))
}

/// Check order: anonymous → 401, missing → 404, invalid body → 400, not the manager → 401.
pub async fn update_event(
    Extension(services): Extension<Arc<AppServices>>,
    principal: Option<Extension<PrincipalContext>>,
    Path(id): Path<String>,
    body: Result<Json<EventDto>, JsonRejection>,
) -> Result<Hal<EventModel>, ApiError> {
    let principal = require_principal(principal)?;
    let id = parse_id(&id)?;
    let mut event = services.events.find_by_id(id).await?.ok_or(ApiError::NotFound)?;

    let dto = read_body(body)?;
    check_event_dto(&dto)?;

    if let Err(e) = authorize_manager(Some(principal.account_id()), event.manager) {
        tracing::warn!(event_id = %event.id, requester = %principal.email(), "update rejected: {e}");
        return Err(ApiError::Unauthorized);
    }

    event.apply_dto(&dto);
    event.update();
    let event = services.events.save(event).await?;

    tracing::info!(event_id = %event.id, "event updated");

    let links = &services.links;
    let event_links = Links::new()
        .with("self", links.event(event.id))
        .with("profile", links.profile("resources-events-update"));
    Ok(Hal::ok(EntityModel::new(event, event_links)))
}
