use axum::{routing::get, Router};

pub mod accounts;
pub mod events;
pub mod oauth;
pub mod system;

/// Router for the `/api` tree.
pub fn router() -> Router {
    Router::new()
        .route("/api", get(system::index))
        .nest("/api/events", events::router())
        .nest("/api/accounts", accounts::router())
}
