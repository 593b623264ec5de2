//! Hypermedia (HAL) response bodies and link building.

use std::collections::BTreeMap;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use eventdesk_core::{EventId, Page, Pageable};

pub const HAL_JSON: &str = "application/hal+json;charset=UTF-8";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

/// `_links` object: relation name to link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Links(BTreeMap<&'static str, Link>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, rel: &'static str, href: impl Into<String>) -> Self {
        self.push(rel, href);
        self
    }

    pub fn push(&mut self, rel: &'static str, href: impl Into<String>) {
        self.0.insert(rel, Link { href: href.into() });
    }
}

/// A single resource with its links inlined next to its fields.
#[derive(Debug, Clone, Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

impl<T> EntityModel<T> {
    pub fn new(content: T, links: Links) -> Self {
        Self { content, links }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
}

impl<T> From<&Page<T>> for PageMetadata {
    fn from(page: &Page<T>) -> Self {
        Self {
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages(),
            number: page.number,
        }
    }
}

/// A page of resources. `_embedded` is omitted for an empty page.
#[derive(Debug, Clone, Serialize)]
pub struct PagedModel<T> {
    #[serde(rename = "_embedded", skip_serializing_if = "BTreeMap::is_empty")]
    pub embedded: BTreeMap<&'static str, Vec<T>>,
    #[serde(rename = "_links")]
    pub links: Links,
    pub page: PageMetadata,
}

impl<T> PagedModel<T> {
    pub fn new(rel: &'static str, items: Vec<T>, links: Links, page: PageMetadata) -> Self {
        let mut embedded = BTreeMap::new();
        if !items.is_empty() {
            embedded.insert(rel, items);
        }
        Self {
            embedded,
            links,
            page,
        }
    }
}

/// HAL JSON response with status and optional `Location`.
#[derive(Debug)]
pub struct Hal<T> {
    status: StatusCode,
    location: Option<String>,
    body: T,
}

impl<T> Hal<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: StatusCode::OK,
            location: None,
            body,
        }
    }

    pub fn created(location: impl Into<String>, body: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            location: Some(location.into()),
            body,
        }
    }
}

impl<T: Serialize> IntoResponse for Hal<T> {
    fn into_response(self) -> Response {
        let bytes = match serde_json::to_vec(&self.body) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize response body");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        let mut response = (self.status, bytes).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON));
        if let Some(location) = self.location {
            match HeaderValue::from_str(&location) {
                Ok(value) => {
                    headers.insert(header::LOCATION, value);
                }
                Err(_) => tracing::warn!(%location, "location is not a valid header value"),
            }
        }
        response
    }
}

/// Absolute link hrefs rooted at the configured public base URL.
#[derive(Debug, Clone)]
pub struct LinkBuilder {
    base: String,
}

impl LinkBuilder {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            base: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn api_root(&self) -> String {
        format!("{}/api", self.base)
    }

    pub fn events(&self) -> String {
        format!("{}/api/events", self.base)
    }

    pub fn event(&self, id: EventId) -> String {
        format!("{}/api/events/{}", self.base, id)
    }

    pub fn events_page(&self, pageable: &Pageable) -> String {
        let mut href = format!("{}?page={}&size={}", self.events(), pageable.page, pageable.size);
        if let Some(sort) = &pageable.sort {
            href.push_str("&sort=");
            href.push_str(&sort.to_query());
        }
        href
    }

    /// Documentation anchor, e.g. `resources-events-create`.
    pub fn profile(&self, anchor: &str) -> String {
        format!("{}/docs/index.html#{}", self.base, anchor)
    }
}
