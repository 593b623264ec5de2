use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use eventdesk_core::AccountId;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;

const OBJECT_NAME: &str = "accountDto";

pub fn router() -> Router {
    Router::new().route("/", post(register))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: AccountId,
    pub email: String,
    pub roles: Vec<&'static str>,
}

/// Self-service sign-up. The password is never echoed back.
pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|r| ApiError::from_json_rejection(OBJECT_NAME, r))?;

    let account = services
        .accounts
        .register(&request.email, &request.password)
        .await?;

    let response = AccountResponse {
        id: account.id,
        email: account.email.clone(),
        roles: account.role_names(),
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}
