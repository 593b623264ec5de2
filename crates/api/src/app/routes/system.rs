use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode};

use crate::app::hal::{Hal, Links};
use crate::app::services::AppServices;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

#[derive(serde::Serialize)]
pub struct Index {
    #[serde(rename = "_links")]
    links: Links,
}

/// API root: entry links for discovery.
pub async fn index(Extension(services): Extension<Arc<AppServices>>) -> Hal<Index> {
    let links = Links::new()
        .with("self", services.links.api_root())
        .with("events", services.links.events());
    Hal::ok(Index { links })
}
