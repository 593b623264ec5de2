//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: repository/token wiring and startup seeding
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `hal.rs`: hypermedia bodies and links
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware;

pub mod errors;
pub mod hal;
pub mod routes;
pub mod services;

use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    let auth_state = middleware::AuthState {
        tokens: services.token_validator.clone(),
    };
    let services = Arc::new(services);

    // Bearer tokens are optional here; handlers that need a principal enforce it.
    let api = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::oauth::router())
        .merge(api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(services)),
        )
}
